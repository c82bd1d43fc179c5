use crate::{
    BusError, BusMessage, BusResult, Channel, MessageHandler, PubSubBus, SubscriptionHandle,
};

use rtg_config::RedisConfig;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use error_location::ErrorLocation;
use futures::StreamExt;
use redis::aio::{ConnectionManager, PubSub};
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

pub const RECONNECT_DELAY: Duration = Duration::from_secs(2);
const COMMAND_QUEUE_SIZE: usize = 256;

pub(crate) type Handlers = Vec<(Uuid, Arc<dyn MessageHandler>)>;

pub(crate) enum ListenerCommand {
    Subscribe {
        handle: SubscriptionHandle,
        handler: Arc<dyn MessageHandler>,
        reply: oneshot::Sender<()>,
    },
    Unsubscribe {
        handle: SubscriptionHandle,
        reply: oneshot::Sender<()>,
    },
    Shutdown,
}

/// State shared between the bus and its listener task.
#[derive(Default)]
pub(crate) struct ListenerState {
    pub(crate) connected: AtomicBool,
    pub(crate) channel_count: AtomicUsize,
}

/// Redis-backed bus.
///
/// `PUBLISH` goes over a multiplexed `ConnectionManager`; a listener task
/// owns the dedicated pub/sub connection, routes messages to handlers and
/// re-subscribes every channel after a reconnect.
pub struct RedisBus {
    publisher: ConnectionManager,
    commands: mpsc::Sender<ListenerCommand>,
    state: Arc<ListenerState>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl RedisBus {
    /// Connect both connections and start the listener.
    pub async fn connect(config: &RedisConfig) -> BusResult<Self> {
        let client = redis::Client::open(config.url()).map_err(redis_error)?;
        let publisher = ConnectionManager::new(client.clone())
            .await
            .map_err(unavailable)?;

        let pubsub = client.get_async_pubsub().await.map_err(unavailable)?;

        let state = Arc::new(ListenerState::default());
        state.connected.store(true, Ordering::SeqCst);

        let (commands, receiver) = mpsc::channel(COMMAND_QUEUE_SIZE);
        let listener = tokio::spawn(run_listener(
            client,
            pubsub,
            receiver,
            Arc::clone(&state),
        ));

        log::info!("Connected to Redis at {}", config.redacted_url());

        Ok(Self {
            publisher,
            commands,
            state,
            listener: Mutex::new(Some(listener)),
        })
    }

    async fn send_command(
        &self,
        command: ListenerCommand,
        reply: oneshot::Receiver<()>,
    ) -> BusResult<()> {
        let stopped = || BusError::ListenerStopped {
            location: ErrorLocation::from(Location::caller()),
        };

        self.commands.send(command).await.map_err(|_| stopped())?;
        reply.await.map_err(|_| stopped())
    }
}

#[async_trait]
impl PubSubBus for RedisBus {
    async fn publish(&self, channel: &Channel, payload: Bytes) -> BusResult<usize> {
        let mut connection = self.publisher.clone();

        let result: redis::RedisResult<i64> = redis::cmd("PUBLISH")
            .arg(channel.as_str())
            .arg(payload.as_ref())
            .query_async(&mut connection)
            .await;

        match result {
            Ok(receivers) => Ok(usize::try_from(receivers).unwrap_or(0)),
            Err(e) => {
                let error = if e.is_io_error()
                    || e.is_connection_dropped()
                    || e.is_connection_refusal()
                    || e.is_timeout()
                {
                    unavailable(e)
                } else {
                    redis_error(e)
                };
                log::warn!("Publish to {} failed: {}", channel, error);
                Err(error)
            }
        }
    }

    async fn subscribe(
        &self,
        channel: &Channel,
        handler: Arc<dyn MessageHandler>,
    ) -> BusResult<SubscriptionHandle> {
        let handle = SubscriptionHandle::new(channel.clone());
        let (reply, done) = oneshot::channel();

        self.send_command(
            ListenerCommand::Subscribe {
                handle: handle.clone(),
                handler,
                reply,
            },
            done,
        )
        .await?;

        Ok(handle)
    }

    async fn unsubscribe(&self, handle: &SubscriptionHandle) -> BusResult<()> {
        let (reply, done) = oneshot::channel();
        self.send_command(
            ListenerCommand::Unsubscribe {
                handle: handle.clone(),
                reply,
            },
            done,
        )
        .await
    }

    fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::SeqCst)
    }

    async fn channel_count(&self) -> usize {
        self.state.channel_count.load(Ordering::SeqCst)
    }

    async fn shutdown(&self) {
        let _ = self.commands.send(ListenerCommand::Shutdown).await;

        let listener = self.listener.lock().await.take();
        if let Some(listener) = listener
            && let Err(e) = listener.await
        {
            log::error!("Redis listener task failed: {}", e);
        }

        self.state.connected.store(false, Ordering::SeqCst);
        log::info!("Redis bus shut down");
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

enum ListenerEvent {
    Message(Option<redis::Msg>),
    Command(Option<ListenerCommand>),
}

/// Result of applying one command to the routing table.
///
/// The reply is held back until the Redis side of the change has run.
pub(crate) struct Applied {
    pub(crate) stop: bool,
    pub(crate) change: Option<ChannelChange>,
    reply: Option<oneshot::Sender<()>>,
}

impl Applied {
    pub(crate) fn acknowledge(&mut self) {
        if let Some(reply) = self.reply.take() {
            let _ = reply.send(());
        }
    }
}

async fn run_listener(
    client: redis::Client,
    pubsub: PubSub,
    mut commands: mpsc::Receiver<ListenerCommand>,
    state: Arc<ListenerState>,
) {
    let mut routes: HashMap<Channel, Handlers> = HashMap::new();
    let mut connection = Some(pubsub);

    loop {
        let mut pubsub = match connection.take() {
            Some(pubsub) => pubsub,
            None => match reconnect(&client, &routes).await {
                Some(pubsub) => {
                    log::info!("Redis pub/sub reconnected ({} channel(s))", routes.len());
                    pubsub
                }
                None => {
                    if wait_offline(&mut commands, &mut routes, &state).await {
                        return;
                    }
                    continue;
                }
            },
        };
        state.connected.store(true, Ordering::SeqCst);

        loop {
            let event = {
                let mut stream = pubsub.on_message();
                tokio::select! {
                    message = stream.next() => ListenerEvent::Message(message),
                    command = commands.recv() => ListenerEvent::Command(command),
                }
            };

            match event {
                ListenerEvent::Message(Some(message)) => dispatch(&routes, message).await,
                ListenerEvent::Message(None) => {
                    log::warn!("Redis pub/sub connection lost, reconnecting");
                    state.connected.store(false, Ordering::SeqCst);
                    break;
                }
                ListenerEvent::Command(Some(command)) => {
                    let mut applied = apply_command(command, &mut routes, &state);
                    let failed = match applied.change.take() {
                        Some(change) => change.execute(&mut pubsub).await.err(),
                        None => None,
                    };
                    // Registrations are kept either way and replayed on reconnect
                    applied.acknowledge();

                    if applied.stop {
                        return;
                    }
                    if let Some(e) = failed {
                        log::warn!("Redis pub/sub command failed, reconnecting: {}", e);
                        state.connected.store(false, Ordering::SeqCst);
                        break;
                    }
                }
                ListenerEvent::Command(None) => return,
            }
        }
    }
}

pub(crate) async fn reconnect(
    client: &redis::Client,
    routes: &HashMap<Channel, Handlers>,
) -> Option<PubSub> {
    let mut pubsub = match client.get_async_pubsub().await {
        Ok(pubsub) => pubsub,
        Err(e) => {
            log::warn!("Redis pub/sub reconnect failed: {}", e);
            return None;
        }
    };

    for channel in routes.keys() {
        if let Err(e) = pubsub.subscribe(channel.as_str()).await {
            log::warn!("Re-subscribing {} failed: {}", channel, e);
            return None;
        }
    }

    Some(pubsub)
}

/// Keep accepting registrations while the broker is unreachable.
/// Returns true when the listener should stop.
pub(crate) async fn wait_offline(
    commands: &mut mpsc::Receiver<ListenerCommand>,
    routes: &mut HashMap<Channel, Handlers>,
    state: &ListenerState,
) -> bool {
    state.connected.store(false, Ordering::SeqCst);
    let deadline = tokio::time::sleep(RECONNECT_DELAY);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => return false,
            command = commands.recv() => match command {
                // Channel changes are replayed by the next reconnect
                Some(command) => {
                    let mut applied = apply_command(command, routes, state);
                    applied.acknowledge();
                    if applied.stop {
                        return true;
                    }
                }
                None => return true,
            },
        }
    }
}

/// Redis-side subscription change implied by a routing update.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ChannelChange {
    Subscribe(Channel),
    Unsubscribe(Channel),
}

impl ChannelChange {
    async fn execute(self, pubsub: &mut PubSub) -> redis::RedisResult<()> {
        match self {
            Self::Subscribe(channel) => pubsub.subscribe(channel.as_str()).await,
            Self::Unsubscribe(channel) => pubsub.unsubscribe(channel.as_str()).await,
        }
    }
}

pub(crate) fn apply_command(
    command: ListenerCommand,
    routes: &mut HashMap<Channel, Handlers>,
    state: &ListenerState,
) -> Applied {
    let applied = match command {
        ListenerCommand::Subscribe {
            handle,
            handler,
            reply,
        } => {
            let handlers = routes.entry(handle.channel.clone()).or_default();
            let first = handlers.is_empty();
            handlers.push((handle.id, handler));
            Applied {
                stop: false,
                change: first.then(|| ChannelChange::Subscribe(handle.channel)),
                reply: Some(reply),
            }
        }
        ListenerCommand::Unsubscribe { handle, reply } => {
            let mut change = None;
            if let Some(handlers) = routes.get_mut(&handle.channel) {
                handlers.retain(|(id, _)| *id != handle.id);
                if handlers.is_empty() {
                    routes.remove(&handle.channel);
                    change = Some(ChannelChange::Unsubscribe(handle.channel));
                }
            }
            Applied {
                stop: false,
                change,
                reply: Some(reply),
            }
        }
        ListenerCommand::Shutdown => Applied {
            stop: true,
            change: None,
            reply: None,
        },
    };

    state.channel_count.store(routes.len(), Ordering::SeqCst);
    applied
}

async fn dispatch(routes: &HashMap<Channel, Handlers>, message: redis::Msg) {
    let channel = Channel::from(message.get_channel_name());
    let Some(handlers) = routes.get(&channel) else {
        return;
    };

    let message = BusMessage::new(channel, Bytes::copy_from_slice(message.get_payload_bytes()));
    for (_, handler) in handlers {
        handler.handle(message.clone()).await;
    }
}

#[track_caller]
fn unavailable(e: redis::RedisError) -> BusError {
    BusError::BrokerUnavailable {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
fn redis_error(e: redis::RedisError) -> BusError {
    BusError::Redis {
        source: e,
        location: ErrorLocation::from(Location::caller()),
    }
}
