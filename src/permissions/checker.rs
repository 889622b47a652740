//! Admin gate with caching.
//!
//! Group rosters list members by phone JID, by LID, or both, and the
//! envelope's idea of "who sent this" may use the other scheme. Every
//! admin decision therefore matches a sender against a roster entry by
//! three strategies in order: exact raw id, canonical phone, LID. A hit
//! on any strategy counts.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::config::Settings;
use crate::identity::{IdentityResolver, Jid};
use crate::store::Stores;
use crate::transport::{GroupMetadata, Participant, Transport};

/// Result of an admin check for one (chat, sender) pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminStatus {
    pub is_sender_admin: bool,
    pub is_bot_admin: bool,
}

type AdminCacheKey = (String, String); // (chat, bare sender)

/// Admin/authorization checker.
///
/// Fail closed: any transport failure yields `{false, false}` - a sender
/// is never assumed to be admin.
#[derive(Clone)]
pub struct AdminGate {
    transport: Arc<dyn Transport>,
    resolver: Arc<IdentityResolver>,
    settings: Arc<Settings>,
    stores: Arc<Stores>,
    cache: TypedCache<AdminCacheKey, AdminStatus>,
}

impl AdminGate {
    pub fn new(
        transport: Arc<dyn Transport>,
        resolver: Arc<IdentityResolver>,
        settings: Arc<Settings>,
        stores: Arc<Stores>,
        cache_registry: &CacheRegistry,
    ) -> Self {
        let cache = cache_registry.get_or_create("admin_status", CacheConfig::admin_roster());

        Self {
            transport,
            resolver,
            settings,
            stores,
            cache,
        }
    }

    /// Check whether `sender` and the bot are admins of `chat`.
    pub async fn check(&self, chat: &Jid, sender: &Jid) -> AdminStatus {
        let cache_key = (chat.to_string(), sender.bare().to_string());
        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("admin cache hit for {} in {}", sender, chat);
            return cached;
        }

        let meta = match self.transport.group_metadata(chat).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!("group metadata fetch failed for {}: {} (failing closed)", chat, e);
                return AdminStatus::default();
            }
        };

        let status = AdminStatus {
            is_sender_admin: self.roster_admin(&meta, sender),
            is_bot_admin: self.roster_admin(&meta, &self.transport.self_jid()),
        };

        self.cache.insert(cache_key, status);
        status
    }

    /// Whether `sender` created the group, by the same three-way match.
    pub fn is_group_creator(&self, meta: &GroupMetadata, sender: &Jid) -> bool {
        let Some(owner) = &meta.owner else {
            return false;
        };
        self.same_identity(owner, sender)
    }

    /// Whether the message may use owner-only commands: sent by the bot's
    /// own account, by the configured owner number, or by a sudo number.
    pub async fn is_owner_or_sudo(&self, from_me: bool, sender: &Jid) -> bool {
        if from_me {
            return true;
        }

        let resolved = self.resolver.resolve(sender);
        let Some(number) = resolved.phone_number() else {
            // Unresolved LID - cannot match a phone-number grant.
            return false;
        };

        if number == self.settings.owner_number {
            return true;
        }
        self.stores.sudo.is_sudo(number).await
    }

    /// Drop every cached admin status. Called when a role change event is
    /// observed for any chat.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
        debug!("invalidated admin cache");
    }

    fn roster_admin(&self, meta: &GroupMetadata, who: &Jid) -> bool {
        meta.participants
            .iter()
            .any(|p| p.is_admin() && self.matches_participant(p, who))
    }

    /// Three comparison strategies, in order: exact raw id, canonical
    /// phone, LID.
    fn matches_participant(&self, p: &Participant, who: &Jid) -> bool {
        let raw = who.bare();

        // 1. Exact raw id against either roster column.
        if p.jid.bare() == raw || p.lid.as_ref().is_some_and(|l| l.bare() == raw) {
            return true;
        }

        // 2. Canonical phone: resolve both sides and compare numbers.
        let resolved = self.resolver.resolve(&raw);
        if let Some(number) = resolved.phone_number() {
            let roster_resolved = self.resolver.resolve(&p.jid.bare());
            if roster_resolved.phone_number() == Some(number) {
                return true;
            }
        }

        // 3. LID: the sender's LID against the roster's LID column.
        if raw.is_lid() {
            return p.lid.as_ref().is_some_and(|l| l.user == raw.user);
        }

        false
    }

    fn same_identity(&self, a: &Jid, b: &Jid) -> bool {
        let a = a.bare();
        let b = b.bare();
        if a == b {
            return true;
        }

        let ra = self.resolver.resolve(&a);
        let rb = self.resolver.resolve(&b);
        match (ra.phone_number(), rb.phone_number()) {
            (Some(na), Some(nb)) => na == nb,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheRegistry;
    use crate::store::Storage;
    use crate::transport::testing::{MemoryTransport, participant};
    use crate::transport::ParticipantRole;
    use std::sync::atomic::Ordering;

    const BOT: &str = "254799999990";

    struct Fixture {
        _dir: tempfile::TempDir,
        transport: Arc<MemoryTransport>,
        gate: AdminGate,
        resolver: Arc<IdentityResolver>,
        stores: Arc<Stores>,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let cache = CacheRegistry::new();
        let stores = Stores::new(&storage, &cache, ".");
        let resolver = Arc::new(IdentityResolver::open(&storage).await);
        let transport = Arc::new(MemoryTransport::new(Jid::phone(BOT)));
        let settings = Arc::new(Settings::new("254799999999", dir.path()));

        let gate = AdminGate::new(
            transport.clone(),
            resolver.clone(),
            settings,
            stores.clone(),
            &cache,
        );

        Fixture {
            _dir: dir,
            transport,
            gate,
            resolver,
            stores,
        }
    }

    fn group(id: &str, owner: Option<Jid>, participants: Vec<crate::transport::Participant>) -> GroupMetadata {
        GroupMetadata {
            id: Jid::group(id),
            subject: "Test Group".into(),
            owner,
            participants,
        }
    }

    #[tokio::test]
    async fn metadata_failure_fails_closed() {
        let fx = fixture().await;
        fx.transport.fail_metadata.store(true, Ordering::SeqCst);

        let status = fx.gate.check(&Jid::group("g1"), &Jid::phone("254700000001")).await;
        assert!(!status.is_sender_admin);
        assert!(!status.is_bot_admin);
    }

    #[tokio::test]
    async fn exact_raw_match_counts_as_admin() {
        let fx = fixture().await;
        let admin = Jid::phone("254700000001");
        fx.transport.seed_group(group(
            "g1",
            None,
            vec![
                participant(admin.clone(), None, ParticipantRole::Admin),
                participant(Jid::phone(BOT), None, ParticipantRole::Admin),
            ],
        ));

        let status = fx.gate.check(&Jid::group("g1"), &admin).await;
        assert!(status.is_sender_admin);
        assert!(status.is_bot_admin);
    }

    #[tokio::test]
    async fn lid_sender_matches_phone_roster_via_resolver() {
        let fx = fixture().await;
        let phone = Jid::phone("254700000001");
        let lid = Jid::lid("8123456789");
        fx.resolver.record(&phone, &lid).await;

        fx.transport.seed_group(group(
            "g1",
            None,
            vec![participant(phone, None, ParticipantRole::SuperAdmin)],
        ));

        let status = fx.gate.check(&Jid::group("g1"), &lid).await;
        assert!(status.is_sender_admin, "canonical-phone strategy must hit");
        assert!(!status.is_bot_admin, "bot is not in this roster");
    }

    #[tokio::test]
    async fn lid_sender_matches_lid_roster_column() {
        let fx = fixture().await;
        let lid = Jid::lid("8123456789");
        // No mapping recorded: only the roster's lid column can match.
        fx.transport.seed_group(group(
            "g1",
            None,
            vec![participant(
                Jid::phone("254700000001"),
                Some(lid.clone()),
                ParticipantRole::Admin,
            )],
        ));

        let status = fx.gate.check(&Jid::group("g1"), &lid).await;
        assert!(status.is_sender_admin);
    }

    #[tokio::test]
    async fn member_is_not_admin() {
        let fx = fixture().await;
        let member = Jid::phone("254700000002");
        fx.transport.seed_group(group(
            "g1",
            None,
            vec![participant(member.clone(), None, ParticipantRole::Member)],
        ));

        let status = fx.gate.check(&Jid::group("g1"), &member).await;
        assert!(!status.is_sender_admin);
    }

    #[tokio::test]
    async fn creator_check_resolves_identities() {
        let fx = fixture().await;
        let owner_phone = Jid::phone("254700000001");
        let owner_lid = Jid::lid("8123456789");
        fx.resolver.record(&owner_phone, &owner_lid).await;

        let meta = group("g1", Some(owner_phone), vec![]);
        assert!(fx.gate.is_group_creator(&meta, &owner_lid));
        assert!(!fx.gate.is_group_creator(&meta, &Jid::phone("254700000002")));
    }

    #[tokio::test]
    async fn owner_and_sudo_grants() {
        let fx = fixture().await;

        // from_me always passes.
        assert!(fx.gate.is_owner_or_sudo(true, &Jid::lid("555")).await);

        // Configured owner number passes.
        assert!(fx.gate.is_owner_or_sudo(false, &Jid::phone("254799999999")).await);

        // Sudo list passes; everyone else is denied.
        let granted = Jid::phone("254700000000");
        assert!(!fx.gate.is_owner_or_sudo(false, &granted).await);
        fx.stores.sudo.add("254700000000").await;
        assert!(fx.gate.is_owner_or_sudo(false, &granted).await);
        assert!(!fx.gate.is_owner_or_sudo(false, &Jid::phone("254711111111")).await);

        // An unresolved LID can never match a phone grant.
        assert!(!fx.gate.is_owner_or_sudo(false, &Jid::lid("777")).await);
    }
}
