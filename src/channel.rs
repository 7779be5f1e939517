//! Intent queue between edge handlers and the poll loop.
//!
//! Button edges arrive in interrupt context, where a rejected send cannot be
//! retried. The queue therefore merges instead of refusing whenever merging
//! keeps the net effect:
//!
//! - a duration change replaces one already pending, only the latest applies;
//! - a toggle arriving at a full queue cancels the newest pending toggle of the
//!   same override, since two flips of one flag leave it unchanged.
//!
//! Intents are drained all at once before the next scheduler pass, so the
//! relative order of a duration change and the toggles around it is not
//! observable.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::intent::SignalIntent;
use crate::mode::Override;

/// Intent rejected because the queue is full and nothing could be merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError(pub SignalIntent);

/// How a sent intent entered the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Appended to the queue
    Queued,
    /// Replaced a pending duration change
    Replaced,
    /// Cancelled a pending toggle of the same override
    Cancelled,
}

/// Bounded intent queue, safe to fill from interrupt handlers
pub struct IntentChannel<const SIZE: usize> {
    queue: Mutex<RefCell<Deque<SignalIntent, SIZE>>>,
}

impl<const SIZE: usize> IntentChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> IntentSender<'_, SIZE> {
        IntentSender { channel: self }
    }

    pub const fn receiver(&self) -> IntentReceiver<'_, SIZE> {
        IntentReceiver { channel: self }
    }

    pub fn try_send(&self, intent: SignalIntent) -> Result<Delivery, TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.queue.borrow(cs).borrow_mut();
            match intent {
                SignalIntent::Durations(_) => {
                    let pending = queue
                        .iter_mut()
                        .find(|queued| matches!(queued, SignalIntent::Durations(_)));
                    if let Some(pending) = pending {
                        *pending = intent;
                        return Ok(Delivery::Replaced);
                    }
                    queue
                        .push_back(intent)
                        .map(|()| Delivery::Queued)
                        .map_err(TrySendError)
                }
                SignalIntent::Toggle(which) => match queue.push_back(intent) {
                    Ok(()) => Ok(Delivery::Queued),
                    Err(intent) => {
                        if cancel_newest_toggle(&mut queue, which) {
                            Ok(Delivery::Cancelled)
                        } else {
                            Err(TrySendError(intent))
                        }
                    }
                },
            }
        })
    }

    /// Oldest pending intent
    pub fn receive(&self) -> Option<SignalIntent> {
        critical_section::with(|cs| self.queue.borrow(cs).borrow_mut().pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.queue.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for IntentChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove the most recent `Toggle(which)`, keeping the order of the rest
fn cancel_newest_toggle<const SIZE: usize>(
    queue: &mut Deque<SignalIntent, SIZE>,
    which: Override,
) -> bool {
    let Some(index) = queue
        .iter()
        .enumerate()
        .filter(|(_, queued)| **queued == SignalIntent::Toggle(which))
        .map(|(index, _)| index)
        .last()
    else {
        return false;
    };

    // Rotate once through the queue, dropping the cancelled entry
    for position in 0..queue.len() {
        if let Some(queued) = queue.pop_front() {
            if position != index {
                // A slot was just freed, so this cannot fail
                let _ = queue.push_back(queued);
            }
        }
    }
    true
}

/// Sending half, handed to edge handlers
#[derive(Clone, Copy)]
pub struct IntentSender<'a, const SIZE: usize> {
    channel: &'a IntentChannel<SIZE>,
}

impl<const SIZE: usize> IntentSender<'_, SIZE> {
    pub fn try_send(&self, intent: SignalIntent) -> Result<Delivery, TrySendError> {
        self.channel.try_send(intent)
    }

    /// Report a button edge
    pub fn toggle(&self, which: Override) -> Result<Delivery, TrySendError> {
        self.try_send(SignalIntent::Toggle(which))
    }
}

/// Receiving half, owned by the controller
#[derive(Clone, Copy)]
pub struct IntentReceiver<'a, const SIZE: usize> {
    channel: &'a IntentChannel<SIZE>,
}

impl<const SIZE: usize> IntentReceiver<'_, SIZE> {
    pub fn receive(&self) -> Option<SignalIntent> {
        self.channel.receive()
    }

    /// Iterate over pending intents, oldest first
    ///
    /// Intents sent while draining are picked up by the same iterator.
    pub fn drain(&self) -> impl Iterator<Item = SignalIntent> + '_ {
        core::iter::from_fn(move || self.channel.receive())
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}
