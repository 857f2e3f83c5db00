/// The Elm Architecture (TEA) pattern implementation for the dashboard
///
/// Each page action is a fetch-then-render pairing: `update` turns a user
/// intent into a `Command`, the executor performs the request, and the result
/// comes back as a `Message` that `update` folds into the `Model`.

pub mod command;
pub mod message;
pub mod model;
pub mod update;

pub use command::{ApiCommand, Command, CommandExecutor};
pub use message::Message;
pub use model::Model;
pub use update::update;

/// Result of processing a TEA update cycle
pub struct UpdateResult<M> {
    pub model: M,
    pub commands: Vec<Command>,
}

impl<M> UpdateResult<M> {
    pub fn just_model(model: M) -> Self {
        Self {
            model,
            commands: Vec::new(),
        }
    }

    pub fn with_command(model: M, command: Command) -> Self {
        Self {
            model,
            commands: vec![command],
        }
    }
}
