pub mod actor;
pub mod arbiter;
pub mod claim;
pub mod dealer;
pub mod event;
pub mod freeze;
pub mod players;
pub mod sink;
pub mod table;
pub mod timer;

pub use actor::*;
pub use arbiter::*;
pub use claim::*;
pub use dealer::*;
pub use event::*;
pub use freeze::*;
pub use players::*;
pub use sink::*;
pub use table::*;
pub use timer::*;
