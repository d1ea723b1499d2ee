//! Table rendering shared by `plan` and `check`.

use crate::core::registration::{RegisteredCase, TestRegistration};
use crate::ui as output;
use colored::Colorize;

pub(crate) fn print_registration(reg: &TestRegistration) {
    if let Some(message) = &reg.skip_message {
        output::skip(&reg.name, message);
        return;
    }

    output::success(&format!(
        "{} {}",
        reg.name,
        format!("({} case{})", reg.cases.len(), plural(reg.cases.len())).dimmed()
    ));
    for case in &reg.cases {
        output::indent(&format!("{:<16} {}", case.id, render_options(case)), 1);
    }
}

fn render_options(case: &RegisteredCase) -> String {
    if case.req_options.is_empty() {
        return "-".dimmed().to_string();
    }
    case.req_options
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
