/*!
 * Devices Module
 * Console and power collaborators
 */

pub mod console;
pub mod power;

pub use console::{BufferedConsole, Console, StdConsole};
pub use power::{PowerControl, SimulatedPower};
