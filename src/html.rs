/// HTML tag emission.
use crate::sanitize::sanitize_attribute;

/// Builds a well-formed HTML tag.
///
/// Attributes are emitted in the order given; entries whose value is `None`
/// or empty are omitted, so output functions can pass optional attributes
/// straight through. Attribute names and values go through the attribute
/// escaper. With `is_closed` false only the opening tag is emitted, for void
/// elements such as `<hr>`, `<br>` and `<img>`.
pub fn html_tag(
    tag: &str,
    content: &str,
    attributes: &[(&str, Option<String>)],
    is_closed: bool,
) -> String {
    let mut attribute_text = String::new();
    for (name, value) in attributes {
        if let Some(value) = value {
            if value.is_empty() {
                continue;
            }
            attribute_text.push(' ');
            attribute_text.push_str(&sanitize_attribute(name));
            attribute_text.push_str("=\"");
            attribute_text.push_str(&sanitize_attribute(value));
            attribute_text.push('"');
        }
    }
    if is_closed {
        format!("<{tag}{attribute_text}>{content}</{tag}>")
    } else {
        format!("<{tag}{attribute_text}>")
    }
}
