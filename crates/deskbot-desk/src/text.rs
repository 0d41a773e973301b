// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat surface texts and keyboards.
//!
//! Every status- and category-dependent message is an exhaustive match, so
//! adding a status or category is a compile-time-checked change.

use deskbot_core::{Action, ActionSet, Ticket, TicketCategory, TicketStatus};

/// Reply-keyboard button that resubmits the requester's last ticket.
pub const REPEAT_LABEL: &str = "Repeat last request";

pub const WELCOME: &str = "Welcome! Choose a request category:";
pub const ADMIN_AUTHORIZED: &str = "You are now signed in as administrator.";
pub const PROMPT_DESCRIPTION: &str = "Please describe your problem in detail:";
pub const TICKET_CONFIRMED: &str =
    "Your request has been created! We will look at it shortly.";
pub const UNAUTHORIZED: &str = "You are not allowed to perform this action.";
pub const BOT_ONLINE: &str = "Deskbot is online and accepting requests.";
pub const BOT_OFFLINE: &str = "Deskbot has stopped.";

/// The main reply keyboard: one row per category, plus the repeat button
/// when the requester has a previous ticket.
pub fn main_keyboard(include_repeat: bool) -> ActionSet {
    let mut rows: Vec<Vec<String>> = TicketCategory::ALL
        .iter()
        .map(|c| vec![c.label().to_string()])
        .collect();
    if include_repeat {
        rows.push(vec![REPEAT_LABEL.to_string()]);
    }
    ActionSet::Buttons(rows)
}

/// Inline accept/reject actions attached to the admin notification.
pub fn triage_actions(ticket_id: &str) -> ActionSet {
    ActionSet::Actions(vec![vec![
        Action {
            label: "Accept".to_string(),
            action_id: format!("accept:{ticket_id}"),
        },
        Action {
            label: "Reject".to_string(),
            action_id: format!("reject:{ticket_id}"),
        },
    ]])
}

/// Admin-facing summary of a newly created ticket.
pub fn new_ticket_summary(ticket: &Ticket, repeated: bool) -> String {
    let marker = if repeated { " (repeat)" } else { "" };
    format!(
        "New request #{}{}\nFrom: @{}\nCategory: {}\nDescription: {}\nCreated: {}",
        ticket.id,
        marker,
        ticket.requester_name,
        ticket.category.label(),
        ticket.description,
        ticket.created_at.to_rfc3339(),
    )
}

/// Admin-facing summary after a status change.
pub fn status_change_summary(ticket: &Ticket) -> String {
    let headline = match ticket.status {
        TicketStatus::Pending => "Request reopened",
        TicketStatus::InProgress => "Request accepted",
        TicketStatus::Completed => "Request completed",
        TicketStatus::Rejected => "Request rejected",
    };
    format!(
        "{}\nRequest #{}\nFrom: @{}\nCategory: {}\nDescription: {}\nUpdated: {}",
        headline,
        ticket.id,
        ticket.requester_name,
        ticket.category.label(),
        ticket.description,
        ticket.updated_at.to_rfc3339(),
    )
}

/// Requester-facing message for a status change.
pub fn status_update_for_requester(ticket: &Ticket) -> String {
    let body = match ticket.status {
        TicketStatus::Pending => "Your request is pending review again.",
        TicketStatus::InProgress => {
            "Your request was accepted! We will contact you shortly."
        }
        TicketStatus::Completed => "Your request is complete. Thank you!",
        TicketStatus::Rejected => {
            "Unfortunately your request was rejected. Please submit a new request with more detail."
        }
    };
    format!("{body}\nRequest #{}", ticket.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_ticket(status: TicketStatus) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: "1700".into(),
            requester_id: "42".into(),
            requester_name: "alice".into(),
            category: TicketCategory::Repair,
            description: "laptop won't boot".into(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn keyboard_lists_every_category() {
        let ActionSet::Buttons(rows) = main_keyboard(false) else {
            panic!("expected reply buttons");
        };
        assert_eq!(rows.len(), TicketCategory::ALL.len());
        for (row, category) in rows.iter().zip(TicketCategory::ALL) {
            assert_eq!(row, &vec![category.label().to_string()]);
        }
    }

    #[test]
    fn keyboard_adds_repeat_row_when_requested() {
        let ActionSet::Buttons(rows) = main_keyboard(true) else {
            panic!("expected reply buttons");
        };
        assert_eq!(rows.last().unwrap(), &vec![REPEAT_LABEL.to_string()]);
    }

    #[test]
    fn triage_actions_carry_ticket_id() {
        let ActionSet::Actions(rows) = triage_actions("1700") else {
            panic!("expected inline actions");
        };
        assert_eq!(rows[0][0].action_id, "accept:1700");
        assert_eq!(rows[0][1].action_id, "reject:1700");
    }

    #[test]
    fn new_ticket_summary_marks_repeats() {
        let ticket = sample_ticket(TicketStatus::Pending);
        assert!(!new_ticket_summary(&ticket, false).contains("(repeat)"));
        assert!(new_ticket_summary(&ticket, true).contains("(repeat)"));
    }

    #[test]
    fn requester_text_mentions_ticket_id_for_every_status() {
        for status in [
            TicketStatus::Pending,
            TicketStatus::InProgress,
            TicketStatus::Completed,
            TicketStatus::Rejected,
        ] {
            let text = status_update_for_requester(&sample_ticket(status));
            assert!(text.contains("#1700"), "missing id for {status}: {text}");
        }
    }
}
