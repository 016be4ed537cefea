//! Command: el control remoto guarda acciones y las ejecuta por índice.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

pub trait Command: Send + Sync {
    fn execute(&self);
}

pub struct Light {
    location: String,
    on: AtomicBool,
}

impl Light {
    pub fn new(location: &str) -> Arc<Self> {
        Arc::new(Light {
            location: location.to_string(),
            on: AtomicBool::new(false),
        })
    }

    pub fn turn_on(&self) {
        debug!(location = %self.location, "light on");
        self.on.store(true, Ordering::SeqCst);
    }

    pub fn turn_off(&self) {
        debug!(location = %self.location, "light off");
        self.on.store(false, Ordering::SeqCst);
    }

    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::SeqCst)
    }
}

pub struct LightOnCommand(pub Arc<Light>);
pub struct LightOffCommand(pub Arc<Light>);

impl Command for LightOnCommand {
    fn execute(&self) {
        self.0.turn_on();
    }
}

impl Command for LightOffCommand {
    fn execute(&self) {
        self.0.turn_off();
    }
}

#[derive(Default)]
pub struct RemoteControl {
    commands: Vec<Box<dyn Command>>,
}

impl RemoteControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: Box<dyn Command>) -> usize {
        self.commands.push(command);
        self.commands.len() - 1
    }

    /// `false` si no hay comando en ese botón
    pub fn press_button(&self, index: usize) -> bool {
        match self.commands.get(index) {
            Some(command) => {
                command.execute();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_drive_the_light() {
        let light = Light::new("living room");
        let mut remote = RemoteControl::new();
        let on = remote.add_command(Box::new(LightOnCommand(light.clone())));
        let off = remote.add_command(Box::new(LightOffCommand(light.clone())));

        assert!(remote.press_button(on));
        assert!(light.is_on());
        assert!(remote.press_button(off));
        assert!(!light.is_on());
    }

    #[test]
    fn test_unknown_button_does_nothing() {
        let remote = RemoteControl::new();
        assert!(!remote.press_button(3));
    }
}
