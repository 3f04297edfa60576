// Character events and their delivery

use super::state::SnowStage;

/// Gameplay event raised during a character tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterEvent {
    /// Left the ground at the start of a hop
    Jumped,
    /// Touched down after being airborne
    Landed,
    /// Jump button released mid-hop, the hop gets cut short
    StoppedJump,
    /// Kicked off a wall
    WallJumped,
    /// Left the snowball stage voluntarily
    Released,
    /// Snapped back to the spawn anchor after a hazard
    ResetToSpawn,
    StageChanged(SnowStage),
}

type Listener = Box<dyn FnMut(&CharacterEvent)>;

/// Synchronous listeners plus a queue drained by the caller after each tick
///
/// Listeners see events in emission order, before they land in the queue.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    queue: Vec<CharacterEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&CharacterEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: CharacterEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> Vec<CharacterEvent> {
        std::mem::take(&mut self.queue)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("queue", &self.queue)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_drain_empties_queue() {
        let mut bus = EventBus::new();
        bus.emit(CharacterEvent::Jumped);
        bus.emit(CharacterEvent::Landed);

        assert_eq!(bus.drain(), vec![CharacterEvent::Jumped, CharacterEvent::Landed]);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_listeners_receive_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let sink = Rc::clone(&seen);
        bus.subscribe(move |event| sink.borrow_mut().push(*event));

        bus.emit(CharacterEvent::StageChanged(SnowStage::Coated));
        bus.emit(CharacterEvent::ResetToSpawn);

        assert_eq!(
            *seen.borrow(),
            vec![
                CharacterEvent::StageChanged(SnowStage::Coated),
                CharacterEvent::ResetToSpawn
            ]
        );
    }

    #[test]
    fn test_no_listeners_still_queues() {
        let mut bus = EventBus::new();
        bus.emit(CharacterEvent::WallJumped);
        assert_eq!(bus.drain(), vec![CharacterEvent::WallJumped]);
    }
}
