use std::collections::VecDeque;

use crate::types::{GameEvent, SoundCue};

/// FIFO of payload-free events.
#[derive(Clone, Debug)]
pub struct EventQueue<T> {
    pending: VecDeque<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, event: T) {
        self.pending.push_back(event);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.pending.iter()
    }
}

impl<T: Copy> EventQueue<T> {
    /// Pops until empty; the handler may post more events onto the same queue.
    pub fn drain_with<F>(&mut self, mut handler: F) -> usize
    where
        F: FnMut(T, &mut Self),
    {
        drain(self, |queue| queue, |queue, event| handler(event, queue)).len()
    }
}

/// Pops from the queue `select` picks out of `owner` until it is empty and
/// returns what was handled, in order. The handler gets `owner` back, so it may
/// post onto the same queue (handled in this drain) or clear it (discarding
/// whatever was still pending).
pub fn drain<C, T, F>(
    owner: &mut C,
    select: fn(&mut C) -> &mut EventQueue<T>,
    mut handler: F,
) -> Vec<T>
where
    T: Copy,
    F: FnMut(&mut C, T),
{
    let mut handled = Vec::new();
    while let Some(event) = select(owner).pop() {
        handler(owner, event);
        handled.push(event);
    }
    handled
}

/// The two queues every manager posts into.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    pub game: EventQueue<GameEvent>,
    pub sounds: EventQueue<SoundCue>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, event: GameEvent) {
        self.game.post(event);
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.sounds.post(cue);
    }

    /// Discards everything queued on both queues.
    pub fn reset(&mut self) {
        self.game.clear();
        self.sounds.clear();
    }

    /// Empties the sound queue in posting order.
    pub fn take_sounds(&mut self) -> Vec<SoundCue> {
        let mut played = Vec::with_capacity(self.sounds.len());
        self.sounds.drain_with(|cue, _| played.push(cue));
        played
    }
}
