//! Event dispatch.
//!
//! One inbound event at a time flows through here: messages are
//! normalized, captured, and then routed to exactly one of {a command
//! handler, the passive detectors}; edit/revoke/role events go to their
//! handlers. Handler failures are caught at this level - the dispatch
//! loop never crashes over one bad command.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::bot::normalize::{self, NormalizedMessage};
use crate::cache::CacheRegistry;
use crate::config::Settings;
use crate::events::{self, CaptureBuffer};
use crate::identity::{IdentityResolver, Jid};
use crate::permissions::AdminGate;
use crate::plugins::{CommandContext, CommandSpec, Registry};
use crate::store::{Prefix, Storage, Stores};
use crate::transport::{Event, MessageEvent, Transport};
use crate::utils::{HttpClient, chance};

/// Probability of telling a banned sender why they are being ignored.
const BANNED_NOTICE_CHANCE: f64 = 0.15;

/// Shared application state, passed to every handler and detector.
#[derive(Clone)]
pub struct AppState {
    pub transport: Arc<dyn Transport>,

    pub settings: Arc<Settings>,

    /// LID-to-phone resolution.
    pub resolver: Arc<IdentityResolver>,

    /// Admin/owner/sudo checks with caching.
    pub gate: AdminGate,

    /// Every per-feature config store.
    pub stores: Arc<Stores>,

    /// Cache registry for creating/accessing caches.
    pub cache: Arc<CacheRegistry>,

    /// Captured message copies for antiedit/antidelete.
    pub captures: Arc<CaptureBuffer>,

    /// Shared HTTP client (timeout + bounded retry).
    pub http: HttpClient,
}

impl AppState {
    /// Create the application state, opening storage under the
    /// configured data directory.
    pub async fn new(transport: Arc<dyn Transport>, settings: Settings) -> anyhow::Result<Self> {
        let settings = Arc::new(settings);
        let storage = Storage::open(&settings.data_dir)?;
        let cache = Arc::new(CacheRegistry::new());
        let stores = Stores::new(&storage, &cache, &settings.default_prefix);
        let resolver = Arc::new(IdentityResolver::open(&storage).await);
        let captures = Arc::new(CaptureBuffer::new(settings.capture_capacity));

        let gate = AdminGate::new(
            transport.clone(),
            resolver.clone(),
            settings.clone(),
            stores.clone(),
            &cache,
        );

        info!("application state initialized (data dir: {})", settings.data_dir.display());

        Ok(Self {
            transport,
            settings,
            resolver,
            gate,
            stores,
            cache,
            captures,
            http: HttpClient::new(),
        })
    }

    /// Whether a JID refers to the bot's own account, under either
    /// identity scheme.
    pub fn is_self(&self, jid: &Jid) -> bool {
        let me = self.transport.self_jid().bare();
        let jid = jid.bare();
        jid == me || self.resolver.resolve(&jid) == me
    }
}

/// Where a message ended up.
enum Routing<'a> {
    /// Sender is banned; drop, with an occasional notice.
    Banned,
    /// Matched command plus its original-case argument remainder.
    Command(&'a CommandSpec, String),
    /// No command matched; passive detectors take it.
    Detectors,
}

/// The event dispatcher.
pub struct Dispatcher {
    state: AppState,
    registry: &'static Registry,
}

impl Dispatcher {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            registry: Registry::builtin(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Entry point for every transport event. Never returns an error:
    /// everything is handled or logged here.
    pub async fn dispatch(&self, event: Event) {
        match event {
            Event::Message(ev) => self.on_message(ev).await,
            Event::MessageEdited(ev) => events::capture::on_edited(&self.state, &ev).await,
            Event::MessageRevoked(ev) => events::capture::on_revoked(&self.state, &ev).await,
            Event::GroupParticipants(ev) => events::roles::on_participants(&self.state, &ev).await,
        }
    }

    async fn on_message(&self, ev: MessageEvent) {
        // The envelope sometimes carries both identity schemes for the
        // sender; that is a transport-asserted correlation, exactly what
        // the resolver is allowed to learn from.
        if let Some(alt) = &ev.sender_alt {
            let (phone, lid) = if ev.sender.is_lid() {
                (alt.bare(), ev.sender.bare())
            } else {
                (ev.sender.bare(), alt.bare())
            };
            self.state.resolver.record(&phone, &lid).await;
        }

        let msg = normalize::normalize(&ev, &self.state.resolver);

        // Capture before routing so later edits/revokes can be replayed.
        events::capture::on_message(&self.state, &msg);

        match self.route(&msg).await {
            Routing::Banned => {
                debug!("dropping message from banned sender {}", msg.sender);
                if chance(BANNED_NOTICE_CHANCE) {
                    let _ = self
                        .state
                        .transport
                        .send_text(&msg.chat, "🚫 You are banned from using this bot.")
                        .await;
                }
            }
            Routing::Command(spec, args) => self.run_command(spec, msg, args).await,
            Routing::Detectors => events::run_message_detectors(&self.state, &msg).await,
        }
    }

    /// Decide the single outcome for a message.
    async fn route(&self, msg: &NormalizedMessage) -> Routing<'_> {
        let command = self.match_command(&msg.text).await;

        if !msg.from_me {
            let resolved = self.state.resolver.resolve(&msg.raw_sender);
            if let Some(number) = resolved.phone_number()
                && self.state.stores.banned.is_banned(number).await
            {
                // Banned senders only ever reach the unban command.
                let is_unban = command.as_ref().is_some_and(|(spec, _)| spec.name == "unban");
                if !is_unban {
                    return Routing::Banned;
                }
            }
        }

        match command {
            Some((spec, args)) => Routing::Command(spec, args),
            None => Routing::Detectors,
        }
    }

    /// Match text against the registry under the current prefix.
    ///
    /// Matching lowercases the command token only; the argument remainder
    /// keeps its original case.
    async fn match_command(&self, text: &str) -> Option<(&CommandSpec, String)> {
        let rest = match self.state.stores.prefix.get().await {
            Prefix::Symbol(p) => text.strip_prefix(p.as_str())?.trim_start().to_string(),
            Prefix::None => text.trim_start().to_string(),
        };

        let mut parts = rest.splitn(2, char::is_whitespace);
        let token = parts.next()?.to_lowercase();
        let args = parts.next().unwrap_or("").trim().to_string();

        self.registry.lookup(&token).map(|spec| (spec, args))
    }

    async fn run_command(&self, spec: &CommandSpec, msg: NormalizedMessage, args: String) {
        debug!("command {} from {} in {}", spec.name, msg.sender, msg.chat);
        let state = &self.state;

        if spec.requires_admin {
            if !msg.is_group {
                self.reply(&msg, "This command only works in groups.").await;
                return;
            }

            let status = state.gate.check(&msg.chat, &msg.raw_sender).await;
            if !status.is_bot_admin {
                self.reply(&msg, "I need admin rights in this group first.").await;
                return;
            }
            if !status.is_sender_admin
                && !state.gate.is_owner_or_sudo(msg.from_me, &msg.sender).await
            {
                self.reply(&msg, "Only group admins can use this command.").await;
                return;
            }
        }

        if spec.requires_owner && !state.gate.is_owner_or_sudo(msg.from_me, &msg.sender).await {
            self.reply(&msg, "This command is restricted to the bot owner.").await;
            return;
        }

        let ctx = CommandContext {
            state: state.clone(),
            msg,
            args,
        };
        if let Err(e) = (spec.handler)(&ctx).await {
            error!("command {} failed: {e:#}", spec.name);
            self.reply(&ctx.msg, "❌ Something went wrong running that command.").await;
        }
    }

    async fn reply(&self, msg: &NormalizedMessage, text: &str) {
        if let Err(e) = self.state.transport.send_text(&msg.chat, text).await {
            warn!("failed to reply in {}: {}", msg.chat, e);
        }
    }
}
