use super::common::{
    annotation_name, child_of_kind, node_location, node_text, point_to_location, qualify,
    resource_identifier, type_name, ParseResult, Parser, Scope,
};
use crate::graph::{
    CallSite, Declaration, DeclarationId, DeclarationKind, Language, ReferenceKind, ResourceUse,
    UnresolvedReference,
};
use miette::{IntoDiagnostic, Result};
use std::path::Path;
use tracing::debug;
use tree_sitter::{Node, Parser as TsParser};

/// Java source code parser using tree-sitter
pub struct JavaParser;

impl JavaParser {
    pub fn new() -> Self {
        Self
    }

    fn extract_package(&self, root: Node, source: &str) -> Option<String> {
        let package = child_of_kind(root, "package_declaration")?;
        let mut cursor = package.walk();
        let name = package
            .children(&mut cursor)
            .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))
            .map(|c| node_text(c, source).to_string());
        name
    }

    fn extract_imports(&self, root: Node, source: &str) -> Vec<String> {
        let mut imports = Vec::new();
        let mut cursor = root.walk();

        for child in root.children(&mut cursor) {
            if child.kind() != "import_declaration" {
                continue;
            }
            let mut import_cursor = child.walk();
            let path = child
                .children(&mut import_cursor)
                .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))
                .map(|c| node_text(c, source));
            let Some(path) = path else {
                continue;
            };

            if child_of_kind(child, "asterisk").is_some() {
                imports.push(format!("{}.*", path));
            } else {
                imports.push(path.to_string());
            }
        }

        imports
    }

    fn extract_declarations(
        &self,
        path: &Path,
        node: Node,
        source: &str,
        package: &Option<String>,
        result: &mut ParseResult,
    ) {
        let mut cursor = node.walk();

        for child in node.children(&mut cursor) {
            match self.type_declaration_kind(child) {
                Some(kind) => self.extract_type(path, child, kind, source, package, None, result),
                None => self.extract_declarations(path, child, source, package, result),
            }
        }
    }

    fn type_declaration_kind(&self, node: Node) -> Option<DeclarationKind> {
        match node.kind() {
            "class_declaration" | "record_declaration" => Some(DeclarationKind::Class),
            "interface_declaration" => Some(DeclarationKind::Interface),
            "enum_declaration" => Some(DeclarationKind::Enum),
            "annotation_type_declaration" => Some(DeclarationKind::Annotation),
            _ => None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn extract_type(
        &self,
        path: &Path,
        node: Node,
        kind: DeclarationKind,
        source: &str,
        package: &Option<String>,
        parent: Option<&Scope>,
        result: &mut ParseResult,
    ) {
        let Some(name) = node
            .child_by_field_name("name")
            .map(|n| node_text(n, source).to_string())
        else {
            return;
        };

        let id = DeclarationId::new(path.to_path_buf(), node.start_byte(), node.end_byte());
        let fqn = qualify(package, parent, &name);

        let mut decl = Declaration::new(id.clone(), name, kind, node_location(path, node), Language::Java);
        decl.fully_qualified_name = Some(fqn.clone());
        decl.super_types = self.extract_super_types(node, source);
        decl.annotations = self.extract_annotations(node, source);
        decl.parent = parent.map(|p| p.id.clone());
        result.declarations.push(decl);

        let scope = Scope { id, fqn };
        if let Some(body) = node.child_by_field_name("body") {
            self.extract_members(path, body, source, package, &scope, result);
        }
    }

    fn extract_members(
        &self,
        path: &Path,
        body: Node,
        source: &str,
        package: &Option<String>,
        scope: &Scope,
        result: &mut ParseResult,
    ) {
        let mut cursor = body.walk();

        for child in body.children(&mut cursor) {
            if let Some(kind) = self.type_declaration_kind(child) {
                self.extract_type(path, child, kind, source, package, Some(scope), result);
                continue;
            }
            match child.kind() {
                "method_declaration" | "annotation_type_element_declaration" => {
                    self.extract_method(path, child, DeclarationKind::Method, source, scope, result);
                }
                "constructor_declaration" => {
                    self.extract_method(path, child, DeclarationKind::Constructor, source, scope, result);
                }
                "field_declaration" | "constant_declaration" => {
                    self.extract_field(path, child, source, scope, result);
                }
                // Members of an enum with constants live in enum_body_declarations
                "enum_body_declarations" => {
                    self.extract_members(path, child, source, package, scope, result);
                }
                _ => {}
            }
        }
    }

    fn extract_method(
        &self,
        path: &Path,
        node: Node,
        kind: DeclarationKind,
        source: &str,
        parent: &Scope,
        result: &mut ParseResult,
    ) {
        let name = node
            .child_by_field_name("name")
            .map(|n| node_text(n, source).to_string())
            .unwrap_or_else(|| "<init>".to_string());

        let id = DeclarationId::new(path.to_path_buf(), node.start_byte(), node.end_byte());

        let mut decl = Declaration::new(id, name.clone(), kind, node_location(path, node), Language::Java);
        if kind == DeclarationKind::Method {
            decl.fully_qualified_name = Some(format!("{}.{}", parent.fqn, name));
        }
        decl.annotations = self.extract_annotations(node, source);
        decl.parent = Some(parent.id.clone());

        result.declarations.push(decl);
    }

    fn extract_field(&self, path: &Path, node: Node, source: &str, parent: &Scope, result: &mut ParseResult) {
        let annotations = self.extract_annotations(node, source);

        // A field declaration can have multiple declarators
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "variable_declarator" {
                continue;
            }
            let Some(name_node) = child.child_by_field_name("name") else {
                continue;
            };
            let name = node_text(name_node, source).to_string();
            let id = DeclarationId::new(path.to_path_buf(), child.start_byte(), child.end_byte());

            let mut decl = Declaration::new(
                id,
                name.clone(),
                DeclarationKind::Field,
                node_location(path, child),
                Language::Java,
            );
            decl.fully_qualified_name = Some(format!("{}.{}", parent.fqn, name));
            decl.annotations = annotations.clone();
            decl.parent = Some(parent.id.clone());

            result.declarations.push(decl);
        }
    }

    fn extract_references(&self, path: &Path, root: Node, source: &str, result: &mut ParseResult) {
        let mut cursor = root.walk();

        loop {
            let current = cursor.node();

            match current.kind() {
                "identifier" => {
                    if let Some(kind) = current.parent().and_then(|p| self.identifier_kind(p, current)) {
                        result.references.push(UnresolvedReference::new(
                            node_text(current, source),
                            kind,
                            node_location(path, current),
                        ));
                    }
                }
                "type_identifier" | "scoped_type_identifier" => {
                    // Parts of a qualified type are covered by the outermost node
                    let nested = current
                        .parent()
                        .map(|p| p.kind() == "scoped_type_identifier")
                        .unwrap_or(false);
                    if !nested {
                        result.references.push(UnresolvedReference::new(
                            node_text(current, source),
                            self.type_reference_kind(current),
                            node_location(path, current),
                        ));
                    }
                }
                "marker_annotation" | "annotation" => {
                    if let Some(name) = current.child_by_field_name("name") {
                        result.references.push(UnresolvedReference::new(
                            &annotation_name(node_text(name, source)),
                            ReferenceKind::Annotation,
                            node_location(path, name),
                        ));
                    }
                }
                "method_invocation" => {
                    if let Some(call) = self.extract_call(path, current, source) {
                        result.calls.push(call);
                    }
                }
                "field_access" => {
                    let is_outermost = current
                        .parent()
                        .map(|p| p.kind() != "field_access")
                        .unwrap_or(true);
                    if is_outermost {
                        if let Some((resource_type, name)) = resource_identifier(node_text(current, source)) {
                            result.resource_uses.push(ResourceUse {
                                resource_type,
                                name,
                                location: node_location(path, current),
                            });
                        }
                    }
                }
                _ => {}
            }

            if cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }

    fn extract_call(&self, path: &Path, node: Node, source: &str) -> Option<CallSite> {
        let name = node.child_by_field_name("name")?;

        let type_arguments = match node.child_by_field_name("type_arguments") {
            Some(arguments) => {
                let mut cursor = arguments.walk();
                let names: Vec<String> = arguments
                    .named_children(&mut cursor)
                    .map(|c| type_name(node_text(c, source)))
                    .filter(|name| !name.is_empty())
                    .collect();
                names
            }
            None => Vec::new(),
        };

        Some(CallSite {
            callee: node_text(name, source).to_string(),
            type_arguments,
            location: point_to_location(
                path,
                name.start_position(),
                node.end_position(),
                name.start_byte(),
                node.end_byte(),
            ),
        })
    }

    fn type_reference_kind(&self, node: Node) -> ReferenceKind {
        let mut ancestor = node.parent();
        while let Some(current) = ancestor {
            match current.kind() {
                "generic_type" | "array_type" => ancestor = current.parent(),
                "type_arguments" => return ReferenceKind::TypeArgument,
                "superclass" | "super_interfaces" | "extends_interfaces" => {
                    return ReferenceKind::Inheritance
                }
                "type_list" => ancestor = current.parent(),
                "object_creation_expression" => return ReferenceKind::Instantiation,
                "class_literal" => return ReferenceKind::ClassLiteral,
                _ => return ReferenceKind::Type,
            }
        }
        ReferenceKind::Type
    }

    fn identifier_kind(&self, parent: Node, identifier: Node) -> Option<ReferenceKind> {
        match parent.kind() {
            "method_invocation" => {
                let is_name = parent
                    .child_by_field_name("name")
                    .map(|n| n.id() == identifier.id())
                    .unwrap_or(false);
                if is_name {
                    Some(ReferenceKind::Call)
                } else {
                    Some(ReferenceKind::Read)
                }
            }
            "method_reference" => Some(ReferenceKind::Reflection),
            "field_access"
            | "assignment_expression"
            | "argument_list"
            | "binary_expression"
            | "unary_expression"
            | "return_statement"
            | "parenthesized_expression"
            | "ternary_expression"
            | "cast_expression"
            | "array_access"
            | "expression_statement"
            | "lambda_expression"
            | "element_value_pair"
            | "instanceof_expression" => Some(ReferenceKind::Read),
            "variable_declarator" => {
                let is_value = parent
                    .child_by_field_name("value")
                    .map(|n| n.id() == identifier.id())
                    .unwrap_or(false);
                is_value.then_some(ReferenceKind::Read)
            }
            _ => None,
        }
    }

    fn extract_super_types(&self, node: Node, source: &str) -> Vec<String> {
        let mut super_types = Vec::new();

        if let Some(superclass) = node.child_by_field_name("superclass") {
            let text = node_text(superclass, source).trim_start_matches("extends");
            super_types.push(type_name(text));
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !matches!(child.kind(), "super_interfaces" | "extends_interfaces") {
                continue;
            }
            let Some(list) = child_of_kind(child, "type_list") else {
                continue;
            };
            let mut type_cursor = list.walk();
            for type_node in list.named_children(&mut type_cursor) {
                super_types.push(type_name(node_text(type_node, source)));
            }
        }

        super_types.retain(|name| !name.is_empty());
        super_types
    }

    fn extract_annotations(&self, node: Node, source: &str) -> Vec<String> {
        let mut annotations = Vec::new();
        let Some(modifiers) = child_of_kind(node, "modifiers") else {
            return annotations;
        };

        let mut cursor = modifiers.walk();
        for modifier in modifiers.children(&mut cursor) {
            if matches!(modifier.kind(), "marker_annotation" | "annotation") {
                annotations.push(annotation_name(node_text(modifier, source)));
            }
        }

        annotations
    }
}

impl Parser for JavaParser {
    fn parse(&self, path: &Path, contents: &str) -> Result<ParseResult> {
        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_java::language())
            .into_diagnostic()?;

        let tree = parser
            .parse(contents, None)
            .ok_or_else(|| miette::miette!("Failed to parse Java file"))?;

        let root = tree.root_node();
        let mut result = ParseResult::new();

        result.package = self.extract_package(root, contents);
        result.imports = self.extract_imports(root, contents);

        let package = result.package.clone();
        self.extract_declarations(path, root, contents, &package, &mut result);
        self.extract_references(path, root, contents, &mut result);

        debug!(
            "Parsed {}: {} declarations, {} references, {} calls",
            path.display(),
            result.declarations.len(),
            result.references.len(),
            result.calls.len()
        );

        Ok(result)
    }
}

impl Default for JavaParser {
    fn default() -> Self {
        Self::new()
    }
}
