//! Message template formatting.

use crate::options::ValidatorOptions;
use std::fmt::Display;

/// Substitute positional placeholders into a message template.
///
/// `{0}` is replaced by the first argument, `{1}` by the second and so on.
/// Placeholders without a matching argument are left untouched.
///
/// ```
/// use modelcheck::format_message;
///
/// assert_eq!(format_message("The minimum value is {0}", &[&10]), "The minimum value is 10");
/// ```
pub fn format_message(template: &str, args: &[&dyn Display]) -> String {
    let mut result = template.to_string();
    for (index, arg) in args.iter().enumerate() {
        let placeholder = format!("{{{}}}", index);
        if result.contains(&placeholder) {
            result = result.replace(&placeholder, &arg.to_string());
        }
    }
    result
}

/// Format the options' message override if present, the default template otherwise.
pub fn resolve_message(
    options: &ValidatorOptions,
    default_template: &str,
    args: &[&dyn Display],
) -> String {
    let template = options.message_override().unwrap_or(default_template);
    format_message(template, args)
}
