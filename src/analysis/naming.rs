/// Layout base name a generated binding class is named after:
/// `ActivityExampleBinding` is generated for `activity_example.xml`.
pub fn binding_layout_name(binding_class: &str) -> String {
    let mut name = String::with_capacity(binding_class.len() + 4);

    for (index, c) in binding_class.chars().enumerate() {
        if c.is_uppercase() {
            if index > 0 {
                name.push('_');
            }
            name.extend(c.to_lowercase());
        } else {
            name.push(c);
        }
    }

    match name.strip_suffix("_binding") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}
