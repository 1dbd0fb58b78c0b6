/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Best-effort broadcast of finder events.
//!
//! Every subscriber owns a bounded channel. Publication never waits: a full
//! channel loses the event for that subscriber only, and a closed channel is
//! removed on the delivery attempt that finds it closed.

use cf_core::FinderEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub type SubscriberId = u64;

/// Receiving end handed to a subscriber.
#[derive(Debug)]
pub struct Subscription {
  id: SubscriberId,
  receiver: mpsc::Receiver<FinderEvent>,
}

impl Subscription {
  pub fn id(&self) -> SubscriberId {
    self.id
  }

  /// Next event, or `None` once the subscriber was removed.
  pub async fn recv(&mut self) -> Option<FinderEvent> {
    self.receiver.recv().await
  }

  pub fn try_recv(&mut self) -> Option<FinderEvent> {
    self.receiver.try_recv().ok()
  }
}

/// Counts from one publication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
  pub delivered: usize,
  pub dropped: usize,
  pub removed: usize,
}

pub struct EventFanout {
  subscribers: Mutex<Vec<(SubscriberId, mpsc::Sender<FinderEvent>)>>,
  next_id: AtomicU64,
  capacity: usize,
}

impl EventFanout {
  /// `capacity` is the default per-subscriber buffer.
  pub fn new(capacity: usize) -> Self {
    Self { subscribers: Mutex::new(Vec::new()), next_id: AtomicU64::new(1), capacity: capacity.max(1) }
  }

  pub fn subscribe(&self) -> Subscription {
    self.subscribe_with_capacity(self.capacity)
  }

  pub fn subscribe_with_capacity(&self, capacity: usize) -> Subscription {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
    self.lock().push((id, sender));
    debug!("Subscriber {} registered", id);
    Subscription { id, receiver }
  }

  pub fn unsubscribe(&self, id: SubscriberId) -> bool {
    let mut subscribers = self.lock();
    let before = subscribers.len();
    subscribers.retain(|(sid, _)| *sid != id);
    before != subscribers.len()
  }

  pub fn subscriber_count(&self) -> usize {
    self.lock().len()
  }

  /// Delivers `event` to every subscriber registered at call time.
  pub fn publish(&self, event: &FinderEvent) -> PublishReport {
    // Send outside the lock so subscribe/unsubscribe never wait on delivery.
    let snapshot = self.lock().clone();
    let mut report = PublishReport::default();
    let mut closed = Vec::new();

    for (id, sender) in &snapshot {
      match sender.try_send(event.clone()) {
        Ok(()) => report.delivered += 1,
        Err(TrySendError::Full(_)) => {
          debug!("Subscriber {} is lagging, dropped {}", id, event.event_type());
          report.dropped += 1;
        }
        Err(TrySendError::Closed(_)) => closed.push(*id),
      }
    }

    if !closed.is_empty() {
      let mut subscribers = self.lock();
      subscribers.retain(|(id, _)| !closed.contains(id));
      report.removed = closed.len();
      debug!("Removed {} closed subscribers", closed.len());
    }

    report
  }

  /// Spawns the task that publishes everything sent on the returned channel.
  /// The task ends once every sender is dropped.
  pub fn spawn_dispatcher(self: &Arc<Self>, capacity: usize) -> (mpsc::Sender<FinderEvent>, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::channel::<FinderEvent>(capacity.max(1));
    let fanout = Arc::clone(self);
    let handle = tokio::spawn(async move {
      while let Some(event) = receiver.recv().await {
        fanout.publish(&event);
      }
      info!("Event dispatcher stopped");
    });
    (sender, handle)
  }

  fn lock(&self) -> MutexGuard<'_, Vec<(SubscriberId, mpsc::Sender<FinderEvent>)>> {
    self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl Default for EventFanout {
  fn default() -> Self {
    Self::new(256)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cf_core::{CoinType, StatsRecord};
  use chrono::Utc;
  use std::time::Duration;

  fn event(n: u64) -> FinderEvent {
    let mut stats = StatsRecord::empty(CoinType::Btc, Utc::now());
    stats.total_wallets = n;
    FinderEvent::stats_update(stats)
  }

  #[tokio::test]
  async fn test_every_subscriber_receives() {
    let fanout = EventFanout::new(8);
    let mut a = fanout.subscribe();
    let mut b = fanout.subscribe();

    let sent = event(1);
    let report = fanout.publish(&sent);
    assert_eq!(report.delivered, 2);
    assert_eq!(a.recv().await, Some(sent.clone()));
    assert_eq!(b.recv().await, Some(sent));
  }

  #[tokio::test]
  async fn test_slow_subscriber_does_not_block_others() {
    let fanout = EventFanout::new(8);
    let _stalled = fanout.subscribe_with_capacity(1);
    let mut responsive = fanout.subscribe_with_capacity(128);

    let received = tokio::time::timeout(Duration::from_secs(1), async {
      for n in 0..100 {
        fanout.publish(&event(n));
      }
      let mut count = 0;
      while responsive.try_recv().is_some() {
        count += 1;
      }
      count
    })
    .await
    .unwrap();

    assert_eq!(received, 100);
    assert_eq!(fanout.subscriber_count(), 2);
  }

  #[tokio::test]
  async fn test_full_buffer_drops_for_that_subscriber() {
    let fanout = EventFanout::new(8);
    let _stalled = fanout.subscribe_with_capacity(1);

    assert_eq!(fanout.publish(&event(1)).delivered, 1);
    let report = fanout.publish(&event(2));
    assert_eq!(report.dropped, 1);
    assert_eq!(fanout.subscriber_count(), 1);
  }

  #[tokio::test]
  async fn test_closed_subscriber_removed_on_publish() {
    let fanout = EventFanout::new(8);
    let gone = fanout.subscribe();
    let _kept = fanout.subscribe();
    drop(gone);

    let report = fanout.publish(&event(1));
    assert_eq!(report.removed, 1);
    assert_eq!(report.delivered, 1);
    assert_eq!(fanout.subscriber_count(), 1);
  }

  #[tokio::test]
  async fn test_unsubscribe() {
    let fanout = EventFanout::new(8);
    let sub = fanout.subscribe();
    assert!(fanout.unsubscribe(sub.id()));
    assert!(!fanout.unsubscribe(sub.id()));
    assert_eq!(fanout.publish(&event(1)).delivered, 0);
  }

  #[tokio::test]
  async fn test_dispatcher_forwards_until_senders_dropped() {
    let fanout = Arc::new(EventFanout::new(8));
    let mut sub = fanout.subscribe();
    let (sender, handle) = fanout.spawn_dispatcher(8);

    sender.send(event(7)).await.unwrap();
    let received = tokio::time::timeout(Duration::from_secs(1), sub.recv()).await.unwrap();
    assert!(matches!(received, Some(FinderEvent::StatsUpdate { stats }) if stats.total_wallets == 7));

    drop(sender);
    tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
  }
}
