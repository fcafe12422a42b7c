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

/// Kotlin source code parser using tree-sitter
pub struct KotlinParser;

impl KotlinParser {
    pub fn new() -> Self {
        Self
    }

    fn extract_package(&self, root: Node, source: &str) -> Option<String> {
        let header = child_of_kind(root, "package_header")?;
        let identifier = child_of_kind(header, "identifier")?;
        Some(node_text(identifier, source).to_string())
    }

    /// Imports as `a.b.C`, `a.b.*` or `a.b.C as D`
    fn extract_imports(&self, root: Node, source: &str) -> Vec<String> {
        let mut imports = Vec::new();
        let Some(import_list) = child_of_kind(root, "import_list") else {
            return imports;
        };

        let mut cursor = import_list.walk();
        for import in import_list.children(&mut cursor) {
            if import.kind() != "import_header" {
                continue;
            }
            // tree-sitter-kotlin has no field names on import headers
            let Some(identifier) = child_of_kind(import, "identifier") else {
                continue;
            };
            let path = node_text(identifier, source);

            if child_of_kind(import, "wildcard_import").is_some() {
                imports.push(format!("{}.*", path));
            } else if let Some(alias) = child_of_kind(import, "import_alias") {
                let alias = node_text(alias, source).trim_start_matches("as").trim();
                imports.push(format!("{} as {}", path, alias));
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
            match child.kind() {
                "class_declaration" | "object_declaration" => {
                    self.extract_class(path, child, source, package, None, result);
                }
                "function_declaration" => {
                    self.extract_function(path, child, source, package, None, result);
                }
                "property_declaration" => {
                    self.extract_property(path, child, source, package, None, result);
                }
                _ => self.extract_declarations(path, child, source, package, result),
            }
        }
    }

    /// Classes, interfaces, enum classes, objects and companion objects
    fn extract_class(
        &self,
        path: &Path,
        node: Node,
        source: &str,
        package: &Option<String>,
        parent: Option<&Scope>,
        result: &mut ParseResult,
    ) {
        let name = match node.kind() {
            "companion_object" => self
                .type_identifier(node, source)
                .unwrap_or_else(|| "Companion".to_string()),
            _ => match self.type_identifier(node, source) {
                Some(name) => name,
                None => {
                    debug!("Skipping unnamed {} in {}", node.kind(), path.display());
                    return;
                }
            },
        };

        let id = DeclarationId::new(path.to_path_buf(), node.start_byte(), node.end_byte());
        let kind = self.determine_class_kind(node, source);

        let mut decl = Declaration::new(
            id.clone(),
            name.clone(),
            kind,
            node_location(path, node),
            Language::Kotlin,
        );
        let fqn = qualify(package, parent, &name);
        decl.fully_qualified_name = Some(fqn.clone());
        decl.super_types = self.extract_super_types(node, source);
        decl.annotations = self.extract_annotations(node, source);
        decl.parent = parent.map(|p| p.id.clone());
        result.declarations.push(decl);

        let scope = Scope { id, fqn };

        // tree-sitter-kotlin has no field name for class_body
        let body = child_of_kind(node, "class_body").or_else(|| child_of_kind(node, "enum_class_body"));
        if let Some(body) = body {
            self.extract_class_members(path, body, source, package, &scope, result);
        } else {
            // `class Foo : Bar by delegate { ... }` parses the body as a
            // trailing lambda of the delegation expression
            self.extract_members_from_misplaced_lambda(path, node, source, package, &scope, result);
        }
    }

    fn extract_members_from_misplaced_lambda(
        &self,
        path: &Path,
        node: Node,
        source: &str,
        package: &Option<String>,
        scope: &Scope,
        result: &mut ParseResult,
    ) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "lambda_literal" => {
                    if let Some(statements) = child_of_kind(child, "statements") {
                        self.extract_class_members(path, statements, source, package, scope, result);
                    }
                }
                "delegation_specifier" | "explicit_delegation" | "call_expression"
                | "call_suffix" | "annotated_lambda" => {
                    self.extract_members_from_misplaced_lambda(path, child, source, package, scope, result);
                }
                _ => {}
            }
        }
    }

    fn extract_class_members(
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
            match child.kind() {
                "class_declaration" | "object_declaration" | "companion_object" => {
                    self.extract_class(path, child, source, package, Some(scope), result);
                }
                "function_declaration" => {
                    self.extract_function(path, child, source, package, Some(scope), result);
                }
                "property_declaration" => {
                    self.extract_property(path, child, source, package, Some(scope), result);
                }
                "secondary_constructor" => {
                    self.extract_constructor(path, child, source, scope, result);
                }
                _ => {}
            }
        }
    }

    fn extract_function(
        &self,
        path: &Path,
        node: Node,
        source: &str,
        package: &Option<String>,
        parent: Option<&Scope>,
        result: &mut ParseResult,
    ) {
        let name = self.extract_function_name(node, source);
        let id = DeclarationId::new(path.to_path_buf(), node.start_byte(), node.end_byte());

        let kind = if parent.is_some() {
            DeclarationKind::Method
        } else {
            DeclarationKind::Function
        };

        let mut decl = Declaration::new(id, name.clone(), kind, node_location(path, node), Language::Kotlin);
        decl.fully_qualified_name = Some(qualify(package, parent, &name));
        decl.annotations = self.extract_annotations(node, source);
        decl.parent = parent.map(|p| p.id.clone());

        result.declarations.push(decl);
    }

    fn extract_property(
        &self,
        path: &Path,
        node: Node,
        source: &str,
        package: &Option<String>,
        parent: Option<&Scope>,
        result: &mut ParseResult,
    ) {
        let Some(variable) = child_of_kind(node, "variable_declaration") else {
            return;
        };
        let Some(name_node) = child_of_kind(variable, "simple_identifier") else {
            return;
        };
        let name = node_text(name_node, source).to_string();

        // Getters and setters are siblings of property_declaration
        let end_byte = self.find_property_end_byte(node);

        let location = point_to_location(
            path,
            node.start_position(),
            node.end_position(),
            node.start_byte(),
            end_byte,
        );
        let id = DeclarationId::new(path.to_path_buf(), node.start_byte(), end_byte);

        let mut decl = Declaration::new(id, name.clone(), DeclarationKind::Property, location, Language::Kotlin);
        decl.fully_qualified_name = Some(qualify(package, parent, &name));
        decl.annotations = self.extract_annotations(node, source);
        decl.parent = parent.map(|p| p.id.clone());

        result.declarations.push(decl);
    }

    fn find_property_end_byte(&self, node: Node) -> usize {
        let mut end_byte = node.end_byte();
        let mut next = node.next_sibling();
        while let Some(sibling) = next {
            match sibling.kind() {
                "getter" | "setter" => {
                    end_byte = sibling.end_byte();
                    next = sibling.next_sibling();
                }
                _ => break,
            }
        }
        end_byte
    }

    fn extract_constructor(
        &self,
        path: &Path,
        node: Node,
        source: &str,
        parent: &Scope,
        result: &mut ParseResult,
    ) {
        let id = DeclarationId::new(path.to_path_buf(), node.start_byte(), node.end_byte());

        let mut decl = Declaration::new(
            id,
            "constructor".to_string(),
            DeclarationKind::Constructor,
            node_location(path, node),
            Language::Kotlin,
        );
        decl.annotations = self.extract_annotations(node, source);
        decl.parent = Some(parent.id.clone());

        result.declarations.push(decl);
    }

    fn extract_references(&self, path: &Path, root: Node, source: &str, result: &mut ParseResult) {
        let mut cursor = root.walk();

        loop {
            let current = cursor.node();

            match current.kind() {
                "simple_identifier" => {
                    if let Some(kind) = current.parent().and_then(|p| self.identifier_kind(p, current)) {
                        result.references.push(UnresolvedReference::new(
                            node_text(current, source),
                            kind,
                            node_location(path, current),
                        ));
                    }
                }
                "user_type" => {
                    let name = type_name(node_text(current, source));
                    if !name.is_empty() {
                        result.references.push(UnresolvedReference::new(
                            &name,
                            self.type_reference_kind(current),
                            node_location(path, current),
                        ));
                    }
                }
                "callable_reference" => {
                    self.extract_callable_reference(path, current, source, result);
                }
                "call_expression" => {
                    if let Some(call) = self.extract_call(path, current, source) {
                        result.calls.push(call);
                    }
                }
                "navigation_expression" => {
                    if let Some((resource_type, name)) = resource_identifier(node_text(current, source)) {
                        result.resource_uses.push(ResourceUse {
                            resource_type,
                            name,
                            location: node_location(path, current),
                        });
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

    /// `Foo::class` names the type; `::bar` and `foo::bar` name a callable
    fn extract_callable_reference(&self, path: &Path, node: Node, source: &str, result: &mut ParseResult) {
        let receiver_kind = if node_text(node, source).trim_end().ends_with("::class") {
            ReferenceKind::ClassLiteral
        } else {
            ReferenceKind::Reflection
        };

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "type_identifier" => {
                    result.references.push(UnresolvedReference::new(
                        &type_name(node_text(child, source)),
                        receiver_kind,
                        node_location(path, child),
                    ));
                }
                "simple_identifier" => {
                    let text = node_text(child, source);
                    if text != "class" {
                        result.references.push(UnresolvedReference::new(
                            text,
                            ReferenceKind::Call,
                            node_location(path, child),
                        ));
                    }
                }
                _ => {}
            }
        }
    }

    /// Callee name and explicit type arguments of a call such as
    /// `viewModels<MainViewModel>()` or `requireActivity().viewModels<T>()`.
    /// The location starts at the callee name, excluding any receiver.
    fn extract_call(&self, path: &Path, node: Node, source: &str) -> Option<CallSite> {
        let callee = node.child(0)?;
        let name_node = match callee.kind() {
            "simple_identifier" => callee,
            "navigation_expression" => {
                let mut cursor = callee.walk();
                let suffix = callee
                    .children(&mut cursor)
                    .filter(|c| c.kind() == "navigation_suffix")
                    .last()?;
                child_of_kind(suffix, "simple_identifier")?
            }
            _ => return None,
        };

        let suffix = child_of_kind(node, "call_suffix")?;
        let type_arguments = match child_of_kind(suffix, "type_arguments") {
            Some(arguments) => {
                let mut cursor = arguments.walk();
                let names: Vec<String> = arguments
                    .children(&mut cursor)
                    .filter(|c| c.kind() == "type_projection")
                    .map(|c| type_name(node_text(c, source)))
                    .filter(|name| !name.is_empty() && name != "*")
                    .collect();
                names
            }
            None => Vec::new(),
        };

        Some(CallSite {
            callee: node_text(name_node, source).to_string(),
            type_arguments,
            location: point_to_location(
                path,
                name_node.start_position(),
                node.end_position(),
                name_node.start_byte(),
                node.end_byte(),
            ),
        })
    }

    fn type_reference_kind(&self, user_type: Node) -> ReferenceKind {
        let mut ancestor = user_type.parent();
        while let Some(node) = ancestor {
            match node.kind() {
                "annotation" => return ReferenceKind::Annotation,
                "type_projection" => return ReferenceKind::TypeArgument,
                "delegation_specifier" => return ReferenceKind::Inheritance,
                "constructor_invocation" | "type_reference" | "nullable_type" => {
                    ancestor = node.parent();
                }
                _ => return ReferenceKind::Type,
            }
        }
        ReferenceKind::Type
    }

    fn identifier_kind(&self, parent: Node, identifier: Node) -> Option<ReferenceKind> {
        match parent.kind() {
            "call_expression" => Some(ReferenceKind::Call),
            "navigation_suffix" => {
                if self.is_navigation_method_call(parent) {
                    Some(ReferenceKind::Call)
                } else {
                    Some(ReferenceKind::Read)
                }
            }
            "infix_expression" => {
                if self.is_infix_function_name(parent, identifier) {
                    Some(ReferenceKind::Call)
                } else {
                    Some(ReferenceKind::Read)
                }
            }
            // Parameter names in named arguments are not references
            "value_argument" => {
                let mut cursor = parent.walk();
                let is_param_name = parent
                    .children(&mut cursor)
                    .find(|c| c.kind() == "=")
                    .map(|eq| identifier.start_byte() < eq.start_byte())
                    .unwrap_or(false);
                (!is_param_name).then_some(ReferenceKind::Read)
            }
            "navigation_expression"
            | "directly_assignable_expression"
            | "assignment"
            | "augmented_assignment"
            | "value_arguments"
            | "property_declaration"
            | "property_delegate"
            | "jump_expression"
            | "function_body"
            | "comparison_expression"
            | "equality_expression"
            | "additive_expression"
            | "multiplicative_expression"
            | "conjunction_expression"
            | "disjunction_expression"
            | "prefix_expression"
            | "postfix_expression"
            | "check_expression"
            | "elvis_expression"
            | "as_expression"
            | "spread_expression"
            | "parenthesized_expression"
            | "indexing_expression"
            | "range_expression"
            | "if_expression"
            | "when_expression"
            | "when_subject"
            | "when_condition"
            | "when_entry"
            | "control_structure_body"
            | "statements"
            | "lambda_literal"
            | "string_literal"
            | "interpolated_expression" => Some(ReferenceKind::Read),
            _ => None,
        }
    }

    /// In `a until b`, `until` is the function name
    fn is_infix_function_name(&self, infix_expr: Node, identifier: Node) -> bool {
        let mut cursor = infix_expr.walk();
        let position = infix_expr
            .children(&mut cursor)
            .filter(|c| c.kind() == "simple_identifier")
            .position(|c| c.id() == identifier.id());
        position == Some(1)
    }

    /// `this.method()` is a call, `this.prop` is a read
    fn is_navigation_method_call(&self, suffix: Node) -> bool {
        let Some(nav_expr) = suffix.parent() else {
            return false;
        };
        if nav_expr.kind() != "navigation_expression" {
            return false;
        }
        match nav_expr.parent() {
            Some(parent) if parent.kind() == "call_expression" => {
                child_of_kind(parent, "call_suffix").is_some()
            }
            _ => false,
        }
    }

    fn type_identifier(&self, node: Node, source: &str) -> Option<String> {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|c| matches!(c.kind(), "type_identifier" | "simple_identifier"))
            .map(|c| node_text(c, source).to_string());
        found
    }

    /// `fun name()` or `fun Receiver.name()`; the name follows the receiver
    fn extract_function_name(&self, node: Node, source: &str) -> String {
        let mut cursor = node.walk();
        let mut found_fun = false;

        for child in node.children(&mut cursor) {
            match child.kind() {
                "fun" => found_fun = true,
                "simple_identifier" if found_fun => return node_text(child, source).to_string(),
                _ => {}
            }
        }

        "<anonymous>".to_string()
    }

    fn determine_class_kind(&self, node: Node, source: &str) -> DeclarationKind {
        if matches!(node.kind(), "object_declaration" | "companion_object") {
            return DeclarationKind::Object;
        }
        if child_of_kind(node, "interface").is_some() {
            return DeclarationKind::Interface;
        }
        if let Some(modifiers) = child_of_kind(node, "modifiers") {
            let mut cursor = modifiers.walk();
            for modifier in modifiers.children(&mut cursor) {
                if modifier.kind() == "class_modifier" {
                    match node_text(modifier, source).trim() {
                        "enum" => return DeclarationKind::Enum,
                        "annotation" => return DeclarationKind::Annotation,
                        _ => {}
                    }
                }
            }
        }
        DeclarationKind::Class
    }

    fn extract_super_types(&self, node: Node, source: &str) -> Vec<String> {
        let mut super_types = Vec::new();

        // Field name on some declarations, plain children on others
        let container = node.child_by_field_name("delegation_specifiers").unwrap_or(node);
        let mut cursor = container.walk();
        for child in container.children(&mut cursor) {
            if child.kind() == "delegation_specifier" {
                let text = node_text(child, source);
                let type_part = text.split(" by ").next().unwrap_or(text);
                let name = type_name(type_part);
                if !name.is_empty() {
                    super_types.push(name);
                }
            }
        }

        super_types
    }

    fn extract_annotations(&self, node: Node, source: &str) -> Vec<String> {
        let mut annotations = Vec::new();

        if let Some(modifiers) = child_of_kind(node, "modifiers") {
            let mut cursor = modifiers.walk();
            for modifier in modifiers.children(&mut cursor) {
                if modifier.kind() == "annotation" {
                    annotations.push(annotation_name(node_text(modifier, source)));
                }
            }
        }

        // tree-sitter-kotlin sometimes attaches annotations to a preceding
        // prefix_expression instead of the declaration's modifiers
        if let Some(prev) = node.prev_sibling() {
            if prev.kind() == "prefix_expression" {
                let mut cursor = prev.walk();
                for child in prev.children(&mut cursor) {
                    if child.kind() == "annotation" {
                        annotations.push(annotation_name(node_text(child, source)));
                    }
                }
            }
        }

        annotations
    }
}

impl Parser for KotlinParser {
    fn parse(&self, path: &Path, contents: &str) -> Result<ParseResult> {
        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_kotlin::language())
            .into_diagnostic()?;

        let tree = parser
            .parse(contents, None)
            .ok_or_else(|| miette::miette!("Failed to parse Kotlin file"))?;

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

impl Default for KotlinParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseResult {
        KotlinParser::new().parse(Path::new("Test.kt"), source).unwrap()
    }

    #[test]
    fn test_parse_package_and_imports() {
        let result = parse(
            r#"
            package com.example

            import androidx.fragment.app.Fragment
            import com.example.ui.*
            import com.example.databinding.ActivityMainBinding as Binding

            class Test
        "#,
        );

        assert_eq!(result.package.as_deref(), Some("com.example"));
        assert_eq!(
            result.imports,
            vec![
                "androidx.fragment.app.Fragment",
                "com.example.ui.*",
                "com.example.databinding.ActivityMainBinding as Binding",
            ]
        );
    }

    #[test]
    fn test_annotated_class_with_super_type() {
        let result = parse(
            r#"
            package com.example

            @AndroidEntryPoint
            class ExampleFragment : Fragment() {
                fun render() {}
            }
        "#,
        );

        let class = result
            .declarations
            .iter()
            .find(|d| d.name == "ExampleFragment")
            .unwrap();
        assert_eq!(class.kind, DeclarationKind::Class);
        assert_eq!(class.fully_qualified_name.as_deref(), Some("com.example.ExampleFragment"));
        assert_eq!(class.annotations, vec!["AndroidEntryPoint"]);
        assert_eq!(class.super_types, vec!["Fragment"]);

        let method = result.declarations.iter().find(|d| d.name == "render").unwrap();
        assert_eq!(
            method.fully_qualified_name.as_deref(),
            Some("com.example.ExampleFragment.render")
        );
        assert_eq!(method.parent.as_ref(), Some(&class.id));
    }

    #[test]
    fn test_annotated_interface_method() {
        let result = parse(
            r#"
            package com.example

            interface ExampleApi {
                @RequiresAndroidEntryPoint
                fun exampleFragment(): Fragment
            }
        "#,
        );

        let api = result.declarations.iter().find(|d| d.name == "ExampleApi").unwrap();
        assert_eq!(api.kind, DeclarationKind::Interface);

        let method = result
            .declarations
            .iter()
            .find(|d| d.name == "exampleFragment")
            .unwrap();
        assert_eq!(method.annotations, vec!["RequiresAndroidEntryPoint"]);
    }

    #[test]
    fn test_view_model_factory_call() {
        let result = parse(
            r#"
            class ExampleActivity : FragmentActivity() {
                private val viewModel by viewModels<ExampleViewModel>()
            }
        "#,
        );

        let call = result.calls.iter().find(|c| c.callee == "viewModels").unwrap();
        assert_eq!(call.type_arguments, vec!["ExampleViewModel"]);
        assert_eq!(call.location.line, 3);

        assert!(result
            .references
            .iter()
            .any(|r| r.name == "ExampleViewModel" && r.kind == ReferenceKind::TypeArgument));
    }

    #[test]
    fn test_resource_identifiers() {
        let result = parse(
            r#"
            class MainActivity : AppCompatActivity() {
                fun onCreate() {
                    setContentView(R.layout.activity_main)
                    val graph = R.navigation.nav_main
                    val label = getString(R.string.app_name)
                }
            }
        "#,
        );

        let uses: Vec<_> = result
            .resource_uses
            .iter()
            .map(|r| (r.resource_type.as_str(), r.name.as_str()))
            .collect();
        assert_eq!(
            uses,
            vec![("layout", "activity_main"), ("navigation", "nav_main"), ("string", "app_name")]
        );
    }

    #[test]
    fn test_constructor_call_reference() {
        let result = parse(
            r#"
            class ExampleActivity : FragmentActivity() {
                fun show() {
                    val fragment = ExampleFragment()
                }
            }
        "#,
        );

        assert!(result
            .references
            .iter()
            .any(|r| r.name == "ExampleFragment" && r.kind == ReferenceKind::Call));
    }

    #[test]
    fn test_class_literal_and_callable_reference() {
        let result = parse(
            r#"
            class ExampleActivity : FragmentActivity() {
                fun show() {
                    supportFragmentManager.beginTransaction()
                        .add(R.id.container, ExampleFragment::class.java, null)
                    val factory = Factory::create
                }
            }
        "#,
        );

        assert!(result
            .references
            .iter()
            .any(|r| r.name == "ExampleFragment" && r.kind == ReferenceKind::ClassLiteral));
        assert!(result
            .references
            .iter()
            .any(|r| r.name == "Factory" && r.kind == ReferenceKind::Reflection));
    }
}
