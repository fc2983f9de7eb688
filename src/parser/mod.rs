pub mod columns;
pub mod deserializers;
pub mod pipeline;
pub mod types;

pub use pipeline::{parse_csv, parse_csv_reader, parse_csv_str, ParseOutput};
pub use types::{ParseWarning, Ticket, TicketRaw};
