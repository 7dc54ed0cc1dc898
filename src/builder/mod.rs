//! Builder API for transition rows and machines.
//!
//! Rows can always be written as struct literals or with
//! [`Transition::new`](crate::engine::Transition::new); the builders exist for
//! tables assembled at runtime, where a missing field should be an error
//! rather than a default.
//!
//! # Example
//!
//! ```
//! use cwsw::builder::{MachineBuilder, TransitionBuilder};
//! use cwsw::core::{Event, Handlers, StatusCode};
//! use cwsw::state_enum;
//!
//! state_enum! {
//!     enum Valve { Closed, Open }
//! }
//!
//! struct Plant;
//!
//! impl Handlers<Valve> for Plant {
//!     fn step(&mut self, _state: Valve, event: &mut Event, _extra: &mut u32) -> StatusCode {
//!         event.id = 1;
//!         StatusCode::Finished
//!     }
//! }
//!
//! let rows = vec![
//!     TransitionBuilder::new().from(Valve::Closed).on(1).to(Valve::Open).build()?,
//!     TransitionBuilder::new().from(Valve::Open).on(1).halt().build()?,
//! ];
//!
//! let mut machine = MachineBuilder::new()
//!     .rows(&rows)
//!     .handlers(Plant)
//!     .initial(Valve::Closed)
//!     .strict()
//!     .build()?;
//!
//! machine.tick(Event::new(0), 0);
//! assert_eq!(machine.current_state(), Some(Valve::Open));
//! # Ok::<(), cwsw::builder::BuildError>(())
//! ```

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;
