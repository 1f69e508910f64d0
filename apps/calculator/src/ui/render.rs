use std::fmt::Write as _;

use shared::domain::Operator;

use crate::controller::orchestration::{Dashboard, View};

pub const TITLE: &str = "Welcome to NEAR XCC-CALCULATOR!";
pub const TAGLINE: &str = "Learn to make cross-contract calls on Near blockchain the easy way.";
pub const SIGN_IN_LABEL: &str = "Sign in with NEAR Wallet";

/// Renders one full screen for the current view.
pub fn render(view: &View) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "{TAGLINE}");
    let _ = writeln!(out);
    match view {
        View::SignInPrompt => {
            let _ = writeln!(out, "[ {SIGN_IN_LABEL} ]  (type `sign-in`)");
        }
        View::Dashboard(dashboard) => render_dashboard(&mut out, dashboard),
    }
    out
}

fn render_dashboard(out: &mut String, dashboard: &Dashboard) {
    let _ = writeln!(out, "[ Sign out {} ]", dashboard.account_id);
    if let Some(contract_id) = &dashboard.contract_id {
        let _ = writeln!(out, "contract: {contract_id}");
    }
    let _ = writeln!(out);

    if dashboard.busy {
        let _ = writeln!(out, "Please wait...");
    } else {
        let form = &dashboard.form;
        let _ = writeln!(out, "Operand1:  {}", form.operand_1);
        let _ = writeln!(out, "Operand2:  {}", form.operand_2);
        let _ = writeln!(out, "Operation: {}", operator_options(form.operator));
        let _ = writeln!(out, "[ Submit ]");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Last operation: {}", dashboard.last_result);
}

/// Lists every option and brackets the selected one.
fn operator_options(selected: Operator) -> String {
    Operator::SELECTABLE
        .iter()
        .map(|operator| {
            if *operator == selected {
                format!("[{}]", operator.label())
            } else {
                operator.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::form::FormState;
    use shared::domain::OperationResult;

    fn dashboard() -> Dashboard {
        Dashboard {
            account_id: "alice.testnet".parse().expect("account"),
            contract_id: Some("calc.testnet".parse().expect("account")),
            form: FormState::default(),
            last_result: OperationResult::default(),
            busy: false,
        }
    }

    #[test]
    fn sign_in_prompt_has_header_and_button() {
        let screen = render(&View::SignInPrompt);
        assert!(screen.starts_with(TITLE));
        assert!(screen.contains(TAGLINE));
        assert!(screen.contains(SIGN_IN_LABEL));
        assert!(!screen.contains("Last operation"));
    }

    #[test]
    fn dashboard_lists_operator_options() {
        let screen = render(&View::Dashboard(dashboard()));
        assert!(screen.contains("Sign out alice.testnet"));
        assert!(screen.contains("Operation: [None] | Add | Sub | Mul | Div"));
        assert!(screen.contains("Last operation: NONE"));
    }

    #[test]
    fn busy_dashboard_hides_form() {
        let mut busy = dashboard();
        busy.busy = true;
        busy.last_result = OperationResult {
            op_1: 3,
            op_2: 4,
            result: 7,
            operator: Operator::Add,
        };
        let screen = render(&View::Dashboard(busy));
        assert!(screen.contains("Please wait..."));
        assert!(!screen.contains("[ Submit ]"));
        assert!(screen.contains("Last operation: 3 + 4 = 7"));
    }
}
