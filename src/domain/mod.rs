pub mod events;
pub mod loan;
pub mod reservation;
pub mod value_objects;

pub use events::*;
pub use reservation::*;
pub use value_objects::*;
