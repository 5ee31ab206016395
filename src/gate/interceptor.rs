use std::sync::Arc;
use tracing::info;

use crate::gate::collaborators::{ActionHandler, Messenger};
use crate::gate::policy::EligibilityPolicy;
use crate::gate::types::{BlockFace, BlockPos, GatedActionRequest, ItemStack, ItemType, PlayerId};

/// Chat prefix for every message the gate sends
pub const MESSAGE_PREFIX: &str = "[BlastGate]";

/// Vetoes gated placements by players who have not played long enough
pub struct ActionInterceptor {
    policy: EligibilityPolicy,
    messenger: Arc<dyn Messenger>,
    gated: ItemType,
}

impl ActionInterceptor {
    pub fn new(policy: EligibilityPolicy, messenger: Arc<dyn Messenger>) -> Self {
        Self::for_item(policy, messenger, ItemType::TNT)
    }

    pub fn for_item(
        policy: EligibilityPolicy,
        messenger: Arc<dyn Messenger>,
        gated: ItemType,
    ) -> Self {
        Self {
            policy,
            messenger,
            gated,
        }
    }

    pub fn gated_item(&self) -> ItemType {
        self.gated
    }

    /// Decide whether an interaction may proceed
    ///
    /// Anything other than the gated item passes straight through.
    pub fn intercept(&self, actor: &PlayerId, item: Option<ItemType>, target: BlockPos) -> bool {
        let Some(item) = item.filter(|item| *item == self.gated) else {
            return true;
        };

        let request = GatedActionRequest {
            actor: actor.clone(),
            item,
            target,
        };
        self.check(&request)
    }

    fn check(&self, request: &GatedActionRequest) -> bool {
        let eligibility = self.policy.evaluate(&request.actor);
        if eligibility.allowed {
            return true;
        }

        self.messenger.send_message(
            &request.actor,
            &denial_message(eligibility.remaining_minutes()),
        );
        info!(
            "BLOCKED {} from placing item {} at {} (insufficient playtime)",
            request.actor, request.item, request.target
        );
        false
    }
}

pub fn denial_message(remaining_minutes: u64) -> String {
    format!(
        "{} You need {} more minutes of playtime to use TNT",
        MESSAGE_PREFIX, remaining_minutes
    )
}

/// Handler installed in place of the host's default one
///
/// Delegates unchanged arguments to the wrapped handler on allow and never
/// reaches it on deny.
pub struct InterceptingHandler {
    inner: Arc<dyn ActionHandler>,
    interceptor: Arc<ActionInterceptor>,
}

impl InterceptingHandler {
    pub fn new(inner: Arc<dyn ActionHandler>, interceptor: Arc<ActionInterceptor>) -> Self {
        Self { inner, interceptor }
    }
}

impl ActionHandler for InterceptingHandler {
    fn interact(
        &self,
        actor: &PlayerId,
        item: Option<ItemStack>,
        target: BlockPos,
        face: BlockFace,
    ) -> bool {
        if !self
            .interceptor
            .intercept(actor, item.map(|stack| stack.item), target)
        {
            return false;
        }
        self.inner.interact(actor, item, target, face)
    }

    fn is_intercepted(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::collaborators::{
        MockActionHandler, MockMessenger, MockPermissionSource, MockPlayerDirectory,
        MockPlaytimeSource, Presence,
    };
    use crate::gate::policy::SharedThreshold;
    use crate::gate::types::minutes;
    use std::time::Duration;

    const STONE: ItemType = ItemType(1);

    fn make_policy(threshold: Duration, played: Duration, bypass: bool) -> EligibilityPolicy {
        let mut directory = MockPlayerDirectory::new();
        directory
            .expect_presence()
            .returning(|_| Some(Presence::Online));
        let mut permissions = MockPermissionSource::new();
        permissions
            .expect_has_capability()
            .returning(move |_, _| bypass);
        let mut playtime = MockPlaytimeSource::new();
        if bypass {
            playtime.expect_total_playtime().times(0);
        } else {
            playtime
                .expect_total_playtime()
                .returning(move |_| Ok(played));
        }
        EligibilityPolicy::new(
            SharedThreshold::new(threshold),
            Arc::new(playtime),
            Arc::new(permissions),
            Arc::new(directory),
        )
    }

    /// Policy whose collaborators panic if touched
    fn untouchable_policy() -> EligibilityPolicy {
        let mut directory = MockPlayerDirectory::new();
        directory.expect_presence().times(0);
        let mut permissions = MockPermissionSource::new();
        permissions.expect_has_capability().times(0);
        let mut playtime = MockPlaytimeSource::new();
        playtime.expect_total_playtime().times(0);
        EligibilityPolicy::new(
            SharedThreshold::new(minutes(60)),
            Arc::new(playtime),
            Arc::new(permissions),
            Arc::new(directory),
        )
    }

    fn silent_messenger() -> MockMessenger {
        let mut messenger = MockMessenger::new();
        messenger.expect_send_message().times(0);
        messenger
    }

    #[test]
    fn test_denies_with_remaining_minutes() {
        let mut messenger = MockMessenger::new();
        messenger
            .expect_send_message()
            .withf(|player, message| {
                player.as_str() == "Steve" && message.contains("30 more minutes")
            })
            .times(1)
            .return_const(());

        let interceptor = ActionInterceptor::new(
            make_policy(minutes(60), minutes(30), false),
            Arc::new(messenger),
        );
        let allowed = interceptor.intercept(
            &PlayerId::new("Steve"),
            Some(ItemType::TNT),
            BlockPos::new(0, 64, 0),
        );
        assert!(!allowed);
    }

    #[test]
    fn test_allows_veteran_player() {
        let interceptor = ActionInterceptor::new(
            make_policy(minutes(60), minutes(90), false),
            Arc::new(silent_messenger()),
        );
        assert!(interceptor.intercept(
            &PlayerId::new("Alex"),
            Some(ItemType::TNT),
            BlockPos::new(5, 70, 5),
        ));
    }

    #[test]
    fn test_allows_bypass_with_zero_playtime() {
        let interceptor = ActionInterceptor::new(
            make_policy(minutes(60), Duration::ZERO, true),
            Arc::new(silent_messenger()),
        );
        assert!(interceptor.intercept(
            &PlayerId::new("Admin"),
            Some(ItemType::TNT),
            BlockPos::new(1, 2, 3),
        ));
    }

    #[test]
    fn test_ungated_items_pass_through_untouched() {
        let interceptor = ActionInterceptor::new(untouchable_policy(), Arc::new(silent_messenger()));
        let actor = PlayerId::new("Builder");
        assert!(interceptor.intercept(&actor, Some(STONE), BlockPos::new(0, 0, 0)));
        assert!(interceptor.intercept(&actor, None, BlockPos::new(0, 0, 0)));
    }

    #[test]
    fn test_custom_gated_item() {
        let interceptor = ActionInterceptor::for_item(
            make_policy(minutes(60), Duration::ZERO, false),
            Arc::new(MockMessenger::default()),
            STONE,
        );
        assert_eq!(interceptor.gated_item(), STONE);
        // TNT is no longer gated
        assert!(interceptor.intercept(
            &PlayerId::new("Newbie"),
            Some(ItemType::TNT),
            BlockPos::new(0, 0, 0),
        ));
    }

    #[test]
    fn test_partial_minute_is_truncated() {
        let mut messenger = MockMessenger::new();
        messenger
            .expect_send_message()
            .withf(|_, message| message.contains("You need 0 more minutes"))
            .times(1)
            .return_const(());

        let interceptor = ActionInterceptor::new(
            make_policy(minutes(60), minutes(60) - Duration::from_secs(30), false),
            Arc::new(messenger),
        );
        assert!(!interceptor.intercept(
            &PlayerId::new("Almost"),
            Some(ItemType::TNT),
            BlockPos::new(0, 0, 0),
        ));
    }

    #[test]
    fn test_handler_never_reaches_inner_on_deny() {
        let mut inner = MockActionHandler::new();
        inner.expect_interact().times(0);
        let mut messenger = MockMessenger::new();
        messenger.expect_send_message().return_const(());

        let interceptor = Arc::new(ActionInterceptor::new(
            make_policy(minutes(60), minutes(10), false),
            Arc::new(messenger),
        ));
        let handler = InterceptingHandler::new(Arc::new(inner), interceptor);

        let placed = handler.interact(
            &PlayerId::new("Steve"),
            Some(ItemStack::new(ItemType::TNT, 1)),
            BlockPos::new(0, 64, 0),
            BlockFace::Up,
        );
        assert!(!placed);
        assert!(handler.is_intercepted());
    }

    #[test]
    fn test_handler_delegates_unchanged_arguments_on_allow() {
        let mut inner = MockActionHandler::new();
        inner
            .expect_interact()
            .withf(|actor, item, target, face| {
                actor.as_str() == "Alex"
                    && *item == Some(ItemStack::new(ItemType(4), 12))
                    && *target == BlockPos::new(-7, 12, 99)
                    && *face == BlockFace::North
            })
            .times(1)
            .return_const(true);

        let interceptor = Arc::new(ActionInterceptor::new(
            untouchable_policy(),
            Arc::new(silent_messenger()),
        ));
        let handler = InterceptingHandler::new(Arc::new(inner), interceptor);

        assert!(handler.interact(
            &PlayerId::new("Alex"),
            Some(ItemStack::new(ItemType(4), 12)),
            BlockPos::new(-7, 12, 99),
            BlockFace::North,
        ));
    }
}
