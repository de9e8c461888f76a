pub mod controller;
pub mod state;

use crate::config::Config;
use crate::error::Result;

use controller::AppController;

/// Entry point used by `main` to bootstrap the controller stack.
pub fn run() -> Result<()> {
    let config = Config::builtin();
    let controller = AppController::new(config)?;
    controller.run()
}
