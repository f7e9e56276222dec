use statig::prelude::*;

use crate::workflows::WorkflowRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Inspect(WorkflowRecord),
    CloseDetails,
    RequestDelete(WorkflowRecord),
    CancelDelete,
    /// The delete call returned, successfully or not.
    DeleteSettled,
}

/// Which record the user is acting on, and which dialog is showing for it.
#[derive(Debug, Default)]
pub struct SelectionMachine {
    selected: Option<WorkflowRecord>,
    details_open: bool,
    confirm_open: bool,
}

#[state_machine(initial = "State::idle()")]
impl SelectionMachine {
    #[state]
    fn idle(&mut self, event: &SelectionEvent) -> Outcome<State> {
        match event {
            SelectionEvent::Inspect(record) => {
                self.open_details(record);
                Transition(State::inspecting())
            }
            SelectionEvent::RequestDelete(record) => {
                self.open_confirm(record);
                Transition(State::confirming_delete())
            }
            _ => Handled,
        }
    }

    #[state]
    fn inspecting(&mut self, event: &SelectionEvent) -> Outcome<State> {
        match event {
            SelectionEvent::CloseDetails => {
                self.clear();
                tracing::debug!("Details closed");
                Transition(State::idle())
            }
            SelectionEvent::Inspect(record) => {
                self.open_details(record);
                Handled
            }
            SelectionEvent::RequestDelete(record) => {
                self.details_open = false;
                self.open_confirm(record);
                Transition(State::confirming_delete())
            }
            _ => Handled,
        }
    }

    #[state]
    fn confirming_delete(&mut self, event: &SelectionEvent) -> Outcome<State> {
        match event {
            SelectionEvent::CancelDelete | SelectionEvent::DeleteSettled => {
                self.clear();
                Transition(State::idle())
            }
            _ => Handled,
        }
    }
}

impl SelectionMachine {
    fn open_details(&mut self, record: &WorkflowRecord) {
        self.selected = Some(record.clone());
        self.details_open = true;
        tracing::debug!(workflow_id = %record.id, "Inspecting workflow");
    }

    fn open_confirm(&mut self, record: &WorkflowRecord) {
        self.selected = Some(record.clone());
        self.confirm_open = true;
        tracing::debug!(workflow_id = %record.id, "Awaiting delete confirmation");
    }

    fn clear(&mut self) {
        self.selected = None;
        self.details_open = false;
        self.confirm_open = false;
    }

    pub fn selected(&self) -> Option<&WorkflowRecord> {
        self.selected.as_ref()
    }

    pub fn details_open(&self) -> bool {
        self.details_open
    }

    pub fn confirm_open(&self) -> bool {
        self.confirm_open
    }

    /// The record awaiting delete confirmation, if the confirmation dialog is up.
    pub fn pending_delete(&self) -> Option<&WorkflowRecord> {
        if self.confirm_open {
            self.selected.as_ref()
        } else {
            None
        }
    }
}
