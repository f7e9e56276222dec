// Client-side query contract for the workflow listing

pub mod controller;
pub mod selection;

pub use controller::{DeleteOutcome, FetchOutcome, FetchTicket, QueryController, ReadModel};
pub use selection::{SelectionEvent, SelectionMachine};
