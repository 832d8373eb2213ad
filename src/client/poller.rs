/**
 * Polling Channel View
 *
 * This module keeps a channel's message list current without a gateway
 * connection. A background task refetches the newest page on a fixed
 * interval and replaces local state wholesale; mutations go through the
 * REST API first and only touch local state after the server confirms.
 *
 * # Refresh Model
 *
 * - The first fetch happens immediately when the poller starts.
 * - Every 5 seconds the full page is refetched and replaces the local
 *   list. A failed fetch keeps the previous list and records the error.
 * - Sends append the server-returned record optimistically. Sends with
 *   images also schedule one extra refetch after 1 second, because
 *   server-assigned image URLs can lag the immediate response.
 * - Edits and deletes mutate the local list only after the server
 *   confirms; a failure leaves prior state untouched.
 *
 * # Gateway Reconciliation
 *
 * When a gateway session is active alongside the poller, broadcast
 * events can be folded in through `apply_event`. Merging is idempotent
 * by message id (insert-or-replace), so seeing the same record from
 * both transports never duplicates it.
 */

use crate::client::api::{ApiClient, ImageAttachment};
use crate::client::error::ClientError;
use crate::shared::{ChatMessage, ServerEvent};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Interval between full refetches
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Delay before the extra refetch that follows an image send
pub const IMAGE_REFETCH_DELAY: Duration = Duration::from_secs(1);

/// Shared poller state read by the view layer
#[derive(Default)]
struct PollerState {
    messages: Vec<ChatMessage>,
    last_error: Option<String>,
}

/// A live message list for one channel, kept fresh by polling
pub struct ChannelPoller {
    api: Arc<ApiClient>,
    channel_id: i64,
    state: Arc<Mutex<PollerState>>,
    poll_task: JoinHandle<()>,
}

impl ChannelPoller {
    /// Start polling the given channel
    ///
    /// The returned poller owns a background task which runs until
    /// `stop` is called or the poller is dropped.
    pub fn start(api: ApiClient, channel_id: i64) -> Self {
        let api = Arc::new(api);
        let state = Arc::new(Mutex::new(PollerState::default()));
        let poll_task = tokio::spawn(poll_loop(api.clone(), channel_id, state.clone()));
        Self {
            api,
            channel_id,
            state,
            poll_task,
        }
    }

    /// The channel this poller is bound to
    pub fn channel_id(&self) -> i64 {
        self.channel_id
    }

    /// Snapshot of the current message list, oldest first
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().unwrap().messages.clone()
    }

    /// The most recent fetch error, cleared by the next successful fetch
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().unwrap().last_error.clone()
    }

    /// Send a message, optimistically appending the confirmed record
    ///
    /// Images switch the submission to multipart. An image send also
    /// schedules one delayed refetch to pick up server-assigned URLs.
    pub async fn send(
        &self,
        content: &str,
        images: Vec<ImageAttachment>,
    ) -> Result<ChatMessage, ClientError> {
        let with_images = !images.is_empty();
        let record = if with_images {
            self.api
                .send_message_with_images(self.channel_id, content, images)
                .await?
        } else {
            self.api.send_message(self.channel_id, content).await?
        };

        merge_message(&mut self.state.lock().unwrap().messages, record.clone());

        if with_images {
            let api = self.api.clone();
            let state = self.state.clone();
            let channel_id = self.channel_id;
            tokio::spawn(async move {
                tokio::time::sleep(IMAGE_REFETCH_DELAY).await;
                refetch(&api, channel_id, &state).await;
            });
        }

        Ok(record)
    }

    /// Edit a message, updating local state after server confirmation
    pub async fn update(
        &self,
        message_id: i64,
        content: &str,
    ) -> Result<ChatMessage, ClientError> {
        let record = self
            .api
            .update_message(self.channel_id, message_id, content)
            .await?;
        merge_message(&mut self.state.lock().unwrap().messages, record.clone());
        Ok(record)
    }

    /// Delete a message, removing it locally after server confirmation
    pub async fn delete(&self, message_id: i64) -> Result<(), ClientError> {
        self.api
            .delete_message(self.channel_id, message_id)
            .await?;
        self.state
            .lock()
            .unwrap()
            .messages
            .retain(|m| m.id != message_id);
        Ok(())
    }

    /// Fold a gateway broadcast into the local list
    ///
    /// Events for other channels are ignored. Deletes are applied by id
    /// alone since message ids are global.
    pub fn apply_event(&self, event: &ServerEvent) {
        let mut guard = self.state.lock().unwrap();
        match event {
            ServerEvent::Message(record) | ServerEvent::MessageUpdated(record) => {
                if record.channel_id == self.channel_id {
                    merge_message(&mut guard.messages, record.clone());
                }
            }
            ServerEvent::MessageDeleted { id } => {
                guard.messages.retain(|m| m.id != *id);
            }
            _ => {}
        }
    }

    /// Stop the background polling task
    pub fn stop(&self) {
        self.poll_task.abort();
    }
}

impl Drop for ChannelPoller {
    fn drop(&mut self) {
        self.poll_task.abort();
    }
}

/// Background refetch loop; the first tick fires immediately so the
/// view has data as soon as the channel is selected
async fn poll_loop(api: Arc<ApiClient>, channel_id: i64, state: Arc<Mutex<PollerState>>) {
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    loop {
        ticker.tick().await;
        refetch(&api, channel_id, &state).await;
    }
}

/// Fetch the newest page and replace local state wholesale
async fn refetch(api: &ApiClient, channel_id: i64, state: &Mutex<PollerState>) {
    match api.list_messages(channel_id, None, None).await {
        Ok(messages) => {
            let mut guard = state.lock().unwrap();
            guard.messages = messages;
            guard.last_error = None;
        }
        Err(e) => {
            tracing::warn!("Channel {} poll failed: {}", channel_id, e);
            state.lock().unwrap().last_error = Some(e.to_string());
        }
    }
}

/// Insert-or-replace a record by id, keeping (created_at, id) order
fn merge_message(messages: &mut Vec<ChatMessage>, record: ChatMessage) {
    if let Some(existing) = messages.iter_mut().find(|m| m.id == record.id) {
        *existing = record;
        return;
    }
    let at = messages
        .iter()
        .rposition(|m| (m.created_at, m.id) <= (record.created_at, record.id))
        .map(|i| i + 1)
        .unwrap_or(0);
    messages.insert(at, record);
}
