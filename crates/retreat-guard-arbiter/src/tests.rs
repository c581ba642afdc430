#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use glam::{Vec2, Vec3};

    use retreat_guard_core::enums::*;
    use retreat_guard_core::settings::Settings;
    use retreat_guard_core::types::*;

    use crate::host::*;
    use crate::position::{resolve_position, should_trust_path};
    use crate::substitution::{run_substitution, ActionExecution, EjectOrRetreat};
    use crate::validation::{is_in_retreat_zone, ActionValidation, InRetreatZone, NotInRetreatZone};
    use crate::zone::{forced_zone_tag, has_forced_zone_tag, is_inside_zone};

    const SCENARIO: &str = "border_skirmish";
    const PLAYER: UnitId = UnitId(1);

    /// In-memory host with a single retreat rectangle [0,0]-[10,10].
    struct FakeHost {
        scenario_key: String,
        zones: HashMap<String, Vec<Rect>>,
        selected: Option<UnitId>,
        ui_mode: UiMode,
        can_process: bool,
        /// The processor is exposed but the call itself fails.
        fail_processing: bool,
        process_calls: u32,
        /// What the trajectory reports at any time.
        processed_end: Vec3,
        knows_unit: bool,
        last_start: f32,
        actions: Vec<(UnitId, ActionSummary)>,
        offered: Vec<OfferedAction>,
        refresh_calls: u32,
        refuse_creation: bool,
        created: Vec<(ActionKey, f32, bool)>,
        next_action: u32,
    }

    impl FakeHost {
        fn new() -> Self {
            let mut zones = HashMap::new();
            zones.insert(SCENARIO.to_string(), vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
            Self {
                scenario_key: SCENARIO.to_string(),
                zones,
                selected: Some(PLAYER),
                ui_mode: UiMode::UnitSelection,
                can_process: true,
                fail_processing: false,
                process_calls: 0,
                processed_end: Vec3::ZERO,
                knows_unit: true,
                last_start: 4.0,
                actions: Vec::new(),
                offered: vec![
                    OfferedAction {
                        key: ActionKey::Eject,
                        available: true,
                    },
                    OfferedAction {
                        key: ActionKey::Retreat,
                        available: true,
                    },
                ],
                refresh_calls: 0,
                refuse_creation: false,
                created: Vec::new(),
                next_action: 100,
            }
        }

        fn queue(&mut self, key: ActionKey, start_time: f32, path: Option<PathRevision>) -> ActionSummary {
            let summary = ActionSummary {
                id: ActionId(self.next_action),
                key,
                start_time,
                duration: 1.0,
                completed: false,
                disposed: false,
                destroyed: false,
                path,
            };
            self.next_action += 1;
            self.actions.push((PLAYER, summary.clone()));
            summary
        }

        fn action(&self, id: ActionId) -> &ActionSummary {
            &self
                .actions
                .iter()
                .find(|(_, a)| a.id == id)
                .expect("action exists")
                .1
        }

        fn live_exits(&self) -> Vec<&ActionSummary> {
            self.actions
                .iter()
                .map(|(_, a)| a)
                .filter(|a| a.is_live() && a.key.is_eject_or_retreat())
                .collect()
        }

        fn set_offered(&mut self, key: ActionKey, available: bool) {
            for offered in &mut self.offered {
                if offered.key == key {
                    offered.available = available;
                }
            }
        }
    }

    impl ScenarioGeometry for FakeHost {
        fn active_scenario_key(&self) -> &str {
            &self.scenario_key
        }

        fn zone_rectangles(&self, scenario_key: &str) -> &[Rect] {
            self.zones.get(scenario_key).map(Vec::as_slice).unwrap_or(&[])
        }
    }

    impl SelectionState for FakeHost {
        fn selected_unit(&self) -> Option<UnitId> {
            self.selected
        }

        fn ui_mode(&self) -> UiMode {
            self.ui_mode
        }
    }

    impl PathSubsystem for FakeHost {
        fn can_process_paths(&self) -> bool {
            self.can_process
        }

        fn process_path(&mut self, _unit: UnitId) -> bool {
            if !self.can_process {
                return false;
            }
            self.process_calls += 1;
            !self.fail_processing
        }

        fn processed_position(&self, _unit: UnitId, _time: f32) -> Option<Vec3> {
            self.knows_unit.then_some(self.processed_end)
        }
    }

    impl ActionTimeline for FakeHost {
        fn last_action_start_time(&self, _unit: UnitId) -> f32 {
            self.last_start
        }
    }

    impl ActionDirectory for FakeHost {
        fn actions_of(&self, unit: UnitId) -> Vec<ActionSummary> {
            self.actions
                .iter()
                .filter(|(owner, _)| *owner == unit)
                .map(|(_, a)| a.clone())
                .collect()
        }

        fn consume_path_change(&mut self, action: ActionId) -> bool {
            for (_, a) in &mut self.actions {
                if a.id == action && a.path == Some(PathRevision::Changed) {
                    a.path = Some(PathRevision::Consumed);
                    return true;
                }
            }
            false
        }

        fn retire_action(&mut self, action: ActionId) {
            for (_, a) in &mut self.actions {
                if a.id == action {
                    a.completed = true;
                    a.disposed = true;
                }
            }
        }
    }

    impl ActionFactory for FakeHost {
        fn create_action(
            &mut self,
            unit: UnitId,
            key: ActionKey,
            start_time: f32,
            refresh_scenario_state: bool,
        ) -> Option<ActionId> {
            if self.refuse_creation {
                return None;
            }
            self.created.push((key, start_time, refresh_scenario_state));
            let id = ActionId(self.next_action);
            self.next_action += 1;
            self.actions.push((
                unit,
                ActionSummary {
                    id,
                    key,
                    start_time,
                    duration: 1.0,
                    completed: false,
                    disposed: false,
                    destroyed: false,
                    path: None,
                },
            ));
            Some(id)
        }
    }

    impl OfferedActions for FakeHost {
        fn refresh_offered_actions(&mut self, _unit: UnitId) -> Vec<OfferedAction> {
            self.refresh_calls += 1;
            self.offered.clone()
        }
    }

    fn player_at(x: f32, z: f32) -> CombatantInfo {
        CombatantInfo {
            id: PLAYER,
            position: Vec3::new(x, 0.0, z),
            player_controllable: true,
            tags: None,
        }
    }

    fn swap_settings() -> Settings {
        Settings {
            use_action_swap: true,
            use_patch: true,
            ..Default::default()
        }
    }

    // ---- Zone classifier ----

    #[test]
    fn test_inside_zone_interior_exterior_and_edges() {
        let host = FakeHost::new();
        assert!(is_inside_zone(&host, Vec2::new(5.0, 5.0)));
        assert!(is_inside_zone(&host, Vec2::new(0.0, 10.0)));
        assert!(is_inside_zone(&host, Vec2::new(10.0, 0.0)));
        assert!(!is_inside_zone(&host, Vec2::new(10.5, 5.0)));
        assert!(!is_inside_zone(&host, Vec2::new(-3.0, -3.0)));
    }

    #[test]
    fn test_inside_zone_any_rectangle() {
        let mut host = FakeHost::new();
        host.zones
            .get_mut(SCENARIO)
            .unwrap()
            .push(Rect::new(50.0, 50.0, 60.0, 60.0));
        assert!(is_inside_zone(&host, Vec2::new(55.0, 55.0)));
        assert!(!is_inside_zone(&host, Vec2::new(30.0, 30.0)));
    }

    #[test]
    fn test_scenario_without_zones_is_never_inside() {
        let mut host = FakeHost::new();
        host.scenario_key = "open_field".to_string();
        assert!(!is_inside_zone(&host, Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_forced_tag_uses_default_state_key() {
        let host = FakeHost::new();
        let settings = Settings::default();
        assert_eq!(forced_zone_tag(&settings, &host), "in_state_retreat_default");

        let mut unit = player_at(100.0, 100.0);
        assert!(!has_forced_zone_tag(&settings, &host, &unit));
        unit.tags = Some(BTreeSet::from(["in_state_retreat_default".to_string()]));
        assert!(has_forced_zone_tag(&settings, &host, &unit));
    }

    #[test]
    fn test_forced_tag_uses_mapped_state_key() {
        let host = FakeHost::new();
        let mut settings = Settings::default();
        settings
            .retreat_zone_state_keys
            .insert(SCENARIO.to_string(), "retreat_river".to_string());

        let mut unit = player_at(100.0, 100.0);
        unit.tags = Some(BTreeSet::from(["in_state_retreat_default".to_string()]));
        assert!(!has_forced_zone_tag(&settings, &host, &unit));
        unit.tags = Some(BTreeSet::from(["in_state_retreat_river".to_string()]));
        assert!(has_forced_zone_tag(&settings, &host, &unit));
    }

    #[test]
    fn test_forced_tag_overrides_geometry() {
        let mut host = FakeHost::new();
        let settings = Settings::default();
        let mut unit = player_at(100.0, 100.0);
        unit.tags = Some(BTreeSet::from(["in_state_retreat_default".to_string()]));
        assert!(is_in_retreat_zone(&settings, &mut host, &unit));
        assert!(InRetreatZone.is_valid(&settings, &mut host, &unit));
        assert!(!NotInRetreatZone.is_valid(&settings, &mut host, &unit));
    }

    // ---- Position resolver ----

    #[test]
    fn test_no_path_uses_stored_position() {
        let mut host = FakeHost::new();
        host.queue(ActionKey::Wait, 1.0, None);
        let unit = player_at(3.0, 4.0);

        assert_eq!(should_trust_path(&host, PLAYER), PathTrust::Absent);
        let resolved = resolve_position(&Settings::default(), &mut host, &unit);
        assert_eq!(resolved.trust, PathTrust::Absent);
        assert_eq!(resolved.end, unit.position);
        assert_eq!(resolved.at_time, None);
        assert_eq!(host.process_calls, 0);
    }

    #[test]
    fn test_stale_path_without_processor_falls_back_to_start() {
        let mut host = FakeHost::new();
        host.can_process = false;
        host.processed_end = Vec3::new(50.0, 0.0, 50.0);
        let moved = host.queue(ActionKey::Move, 0.0, Some(PathRevision::Changed));
        let unit = player_at(3.0, 4.0);

        assert_eq!(should_trust_path(&host, PLAYER), PathTrust::StaleUnprocessable);
        let resolved = resolve_position(&Settings::default(), &mut host, &unit);
        assert_eq!(resolved.trust, PathTrust::StaleUnprocessable);
        assert_eq!(resolved.effective_position(), unit.position);
        assert_eq!(host.action(moved.id).path, Some(PathRevision::Changed));
        assert_eq!(host.process_calls, 0);
    }

    #[test]
    fn test_changed_path_is_processed_and_consumed_once() {
        let mut host = FakeHost::new();
        host.processed_end = Vec3::new(20.0, 0.0, 4.0);
        let first = host.queue(ActionKey::Move, 0.0, Some(PathRevision::Changed));
        let second = host.queue(ActionKey::Dash, 5.0, Some(PathRevision::Changed));
        let unit = player_at(3.0, 4.0);

        let resolved = resolve_position(&Settings::default(), &mut host, &unit);
        assert_eq!(resolved.trust, PathTrust::Resolved);
        assert!(resolved.reprocessed);
        assert_eq!(resolved.at_time, Some(host.last_start));
        assert_eq!(resolved.end, Vec3::new(20.0, 0.0, 4.0));
        assert_eq!(host.process_calls, 1);
        assert_eq!(host.action(first.id).path, Some(PathRevision::Consumed));
        assert_eq!(host.action(second.id).path, Some(PathRevision::Consumed));

        let again = resolve_position(&Settings::default(), &mut host, &unit);
        assert!(!again.reprocessed);
        assert_eq!(again.end, resolved.end);
        assert_eq!(host.process_calls, 1);
    }

    #[test]
    fn test_failed_processing_keeps_change_and_uses_start() {
        let mut host = FakeHost::new();
        host.fail_processing = true;
        host.processed_end = Vec3::new(50.0, 0.0, 50.0);
        let moved = host.queue(ActionKey::Move, 0.0, Some(PathRevision::Changed));
        let unit = player_at(3.0, 4.0);

        let resolved = resolve_position(&Settings::default(), &mut host, &unit);
        assert_eq!(resolved.trust, PathTrust::StaleUnprocessable);
        assert!(!resolved.reprocessed);
        assert_eq!(resolved.end, unit.position);
        assert_eq!(resolved.effective_position(), unit.position);
        assert_eq!(host.process_calls, 1);
        assert_eq!(host.action(moved.id).path, Some(PathRevision::Changed));

        // Once processing works again the pending change is picked up.
        host.fail_processing = false;
        let retried = resolve_position(&Settings::default(), &mut host, &unit);
        assert_eq!(retried.trust, PathTrust::Resolved);
        assert!(retried.reprocessed);
        assert_eq!(host.action(moved.id).path, Some(PathRevision::Consumed));
    }

    #[test]
    fn test_unknown_trajectory_end_falls_back_to_start() {
        let mut host = FakeHost::new();
        host.knows_unit = false;
        host.queue(ActionKey::Move, 0.0, Some(PathRevision::Consumed));
        let unit = player_at(30.0, 5.0);

        let resolved = resolve_position(&Settings::default(), &mut host, &unit);
        assert_eq!(resolved.trust, PathTrust::Resolved);
        assert_eq!(resolved.end, unit.position);
        assert!(!resolved.effectively_moved());
        assert!(!is_in_retreat_zone(&Settings::default(), &mut host, &unit));
    }

    #[test]
    fn test_dead_actions_are_ignored_by_scan() {
        let mut host = FakeHost::new();
        host.can_process = false;
        let stale = host.queue(ActionKey::Move, 0.0, Some(PathRevision::Changed));
        host.retire_action(stale.id);

        assert_eq!(should_trust_path(&host, PLAYER), PathTrust::Absent);
        let resolved = resolve_position(&Settings::default(), &mut host, &player_at(1.0, 1.0));
        assert_eq!(resolved.trust, PathTrust::Absent);
        assert_eq!(host.action(stale.id).path, Some(PathRevision::Changed));
    }

    #[test]
    fn test_negligible_displacement_classifies_start() {
        let mut host = FakeHost::new();
        // Start just inside the right edge, end 0.5 units outside it.
        host.processed_end = Vec3::new(10.3, 0.0, 5.0);
        host.queue(ActionKey::Move, 0.0, Some(PathRevision::Consumed));
        let unit = player_at(9.8, 5.0);

        let resolved = resolve_position(&Settings::default(), &mut host, &unit);
        assert!((resolved.displacement() - 0.5).abs() < 1e-4);
        assert!(!resolved.effectively_moved());
        assert_eq!(resolved.effective_position(), unit.position);
        assert!(is_in_retreat_zone(&Settings::default(), &mut host, &unit));
    }

    #[test]
    fn test_real_movement_classifies_end() {
        let mut host = FakeHost::new();
        host.processed_end = Vec3::new(25.0, 0.0, 5.0);
        host.queue(ActionKey::Move, 0.0, Some(PathRevision::Consumed));
        let unit = player_at(5.0, 5.0);

        assert!(!is_in_retreat_zone(&Settings::default(), &mut host, &unit));
    }

    // ---- Validation ----

    #[test]
    fn test_validators_unconstrained_for_unselected_units() {
        let settings = swap_settings();
        for (x, z) in [(5.0, 5.0), (50.0, 50.0)] {
            let mut host = FakeHost::new();
            host.selected = Some(UnitId(99));
            let unit = player_at(x, z);
            assert!(InRetreatZone.is_valid(&settings, &mut host, &unit));
            assert!(NotInRetreatZone.is_valid(&settings, &mut host, &unit));

            host.selected = None;
            assert!(InRetreatZone.is_valid(&settings, &mut host, &unit));
            assert!(NotInRetreatZone.is_valid(&settings, &mut host, &unit));
        }
    }

    #[test]
    fn test_validators_unconstrained_for_ai_units() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        let mut unit = player_at(5.0, 5.0);
        unit.player_controllable = false;
        assert!(InRetreatZone.is_valid(&settings, &mut host, &unit));
        assert!(NotInRetreatZone.is_valid(&settings, &mut host, &unit));
    }

    #[test]
    fn test_validators_unconstrained_outside_unit_selection_mode() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        host.ui_mode = UiMode::PathPainting;
        let unit = player_at(50.0, 50.0);
        assert!(InRetreatZone.is_valid(&settings, &mut host, &unit));
        assert!(NotInRetreatZone.is_valid(&settings, &mut host, &unit));
    }

    #[test]
    fn test_validators_follow_zone_for_selected_unit() {
        let settings = swap_settings();
        let mut host = FakeHost::new();

        let inside = player_at(5.0, 5.0);
        assert!(InRetreatZone.is_valid(&settings, &mut host, &inside));
        assert!(!NotInRetreatZone.is_valid(&settings, &mut host, &inside));
        assert!(ValidationKind::InRetreatZone.is_valid(&settings, &mut host, &inside));

        let outside = player_at(50.0, 5.0);
        assert!(!InRetreatZone.is_valid(&settings, &mut host, &outside));
        assert!(NotInRetreatZone.is_valid(&settings, &mut host, &outside));
        assert!(ValidationKind::NotInRetreatZone.is_valid(&settings, &mut host, &outside));
    }

    // ---- Substitution ----

    #[test]
    fn test_eject_inside_zone_becomes_retreat() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        let eject = host.queue(ActionKey::Eject, 3.5, None);
        let unit = player_at(5.0, 5.0);

        let outcome = EjectOrRetreat.run(&settings, &mut host, &unit, &eject);
        let SubstitutionOutcome::Substituted { key, replacement } = outcome else {
            panic!("expected substitution, got {outcome:?}");
        };
        assert_eq!(key, ActionKey::Retreat);
        assert_eq!(host.created, vec![(ActionKey::Retreat, 3.5, false)]);
        assert_eq!(host.refresh_calls, 1);

        let original = host.action(eject.id);
        assert!(original.completed);
        assert!(original.disposed);
        assert!(!original.destroyed);

        let created = host.action(replacement);
        assert_eq!(created.key, ActionKey::Retreat);
        assert_eq!(created.start_time, 3.5);
    }

    #[test]
    fn test_retreat_outside_zone_becomes_eject() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        let retreat = host.queue(ActionKey::Retreat, 2.0, None);
        let unit = player_at(40.0, 40.0);

        let outcome = run_substitution(&settings, &mut host, &unit, &retreat);
        assert!(matches!(
            outcome,
            SubstitutionOutcome::Substituted {
                key: ActionKey::Eject,
                ..
            }
        ));
        assert!(host.action(retreat.id).disposed);
    }

    #[test]
    fn test_substitution_leaves_exactly_one_live_exit() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        let eject = host.queue(ActionKey::Eject, 3.0, None);
        let unit = player_at(5.0, 5.0);

        assert!(run_substitution(&settings, &mut host, &unit, &eject).is_substituted());
        let live = host.live_exits();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].key, ActionKey::Retreat);
    }

    #[test]
    fn test_misplaced_exit_retired_when_correct_exit_already_live() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        let retreat = host.queue(ActionKey::Retreat, 1.0, None);
        let eject = host.queue(ActionKey::Eject, 2.0, None);
        let unit = player_at(5.0, 5.0);

        let outcome = run_substitution(&settings, &mut host, &unit, &eject);
        assert_eq!(
            outcome,
            SubstitutionOutcome::RetiredAsDuplicate {
                key: ActionKey::Retreat,
                existing: retreat.id,
            }
        );
        assert!(!outcome.is_substituted());
        assert!(host.created.is_empty());
        assert_eq!(host.refresh_calls, 0);
        assert!(host.action(eject.id).disposed);
        assert_eq!(host.action(retreat.id), &retreat);

        let live = host.live_exits();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, retreat.id);
    }

    #[test]
    fn test_retired_exit_does_not_block_substitution() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        let old = host.queue(ActionKey::Retreat, 1.0, None);
        host.retire_action(old.id);
        let eject = host.queue(ActionKey::Eject, 2.0, None);
        let unit = player_at(5.0, 5.0);

        assert!(run_substitution(&settings, &mut host, &unit, &eject).is_substituted());
        assert_eq!(host.live_exits().len(), 1);
    }

    #[test]
    fn test_substitution_is_idempotent_on_correct_action() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        let retreat = host.queue(ActionKey::Retreat, 3.0, None);
        let unit = player_at(5.0, 5.0);

        for _ in 0..2 {
            let outcome = run_substitution(&settings, &mut host, &unit, &retreat);
            assert_eq!(outcome, SubstitutionOutcome::AlreadyCorrect);
        }
        assert!(host.created.is_empty());
        assert_eq!(host.action(retreat.id), &retreat);
        assert_eq!(host.refresh_calls, 0);
    }

    #[test]
    fn test_second_pass_after_substitution_is_noop() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        let eject = host.queue(ActionKey::Eject, 3.0, None);
        let unit = player_at(5.0, 5.0);

        let SubstitutionOutcome::Substituted { replacement, .. } =
            run_substitution(&settings, &mut host, &unit, &eject)
        else {
            panic!("expected substitution");
        };
        let created = host.action(replacement).clone();
        assert_eq!(
            run_substitution(&settings, &mut host, &unit, &created),
            SubstitutionOutcome::AlreadyCorrect
        );
        let retired = host.action(eject.id).clone();
        assert_eq!(
            run_substitution(&settings, &mut host, &unit, &retired),
            SubstitutionOutcome::ActionNotLive
        );
        assert_eq!(host.created.len(), 1);
    }

    #[test]
    fn test_unavailable_replacement_leaves_original() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        host.set_offered(ActionKey::Retreat, false);
        let eject = host.queue(ActionKey::Eject, 3.0, None);
        let unit = player_at(5.0, 5.0);

        let outcome = run_substitution(&settings, &mut host, &unit, &eject);
        assert_eq!(
            outcome,
            SubstitutionOutcome::ReplacementUnavailable {
                key: ActionKey::Retreat
            }
        );
        assert!(host.created.is_empty());
        assert_eq!(host.action(eject.id), &eject);
        assert_eq!(host.refresh_calls, 1);
    }

    #[test]
    fn test_unoffered_replacement_leaves_original() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        host.offered.retain(|o| o.key != ActionKey::Eject);
        let retreat = host.queue(ActionKey::Retreat, 3.0, None);
        let unit = player_at(40.0, 40.0);

        let outcome = run_substitution(&settings, &mut host, &unit, &retreat);
        assert_eq!(
            outcome,
            SubstitutionOutcome::ReplacementUnavailable {
                key: ActionKey::Eject
            }
        );
        assert_eq!(host.action(retreat.id), &retreat);
    }

    #[test]
    fn test_refused_creation_leaves_original() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        host.refuse_creation = true;
        let eject = host.queue(ActionKey::Eject, 3.0, None);
        let unit = player_at(5.0, 5.0);

        let outcome = run_substitution(&settings, &mut host, &unit, &eject);
        assert_eq!(
            outcome,
            SubstitutionOutcome::CreationFailed {
                key: ActionKey::Retreat
            }
        );
        assert_eq!(host.action(eject.id), &eject);
    }

    #[test]
    fn test_substitution_gates() {
        let mut host = FakeHost::new();
        let eject = host.queue(ActionKey::Eject, 3.0, None);
        let wait = host.queue(ActionKey::Wait, 1.0, None);
        let unit = player_at(5.0, 5.0);

        assert_eq!(
            run_substitution(&Settings::default(), &mut host, &unit, &eject),
            SubstitutionOutcome::SwapDisabled
        );

        let settings = swap_settings();
        assert_eq!(
            run_substitution(&settings, &mut host, &unit, &wait),
            SubstitutionOutcome::NotEjectOrRetreat
        );

        let mut ai = unit.clone();
        ai.player_controllable = false;
        assert_eq!(
            run_substitution(&settings, &mut host, &ai, &eject),
            SubstitutionOutcome::NotPlayerControlled
        );

        host.selected = Some(UnitId(42));
        assert_eq!(
            run_substitution(&settings, &mut host, &unit, &eject),
            SubstitutionOutcome::NotSelected
        );

        assert!(host.created.is_empty());
        assert_eq!(host.action(eject.id), &eject);
    }

    #[test]
    fn test_substitution_uses_resolved_path_end() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        // Unit starts outside and walks into the zone before ejecting.
        host.processed_end = Vec3::new(5.0, 0.0, 5.0);
        let moved = host.queue(ActionKey::Move, 0.0, Some(PathRevision::Changed));
        let eject = host.queue(ActionKey::Eject, 5.0, None);
        let unit = player_at(30.0, 5.0);

        let outcome = run_substitution(&settings, &mut host, &unit, &eject);
        assert!(matches!(
            outcome,
            SubstitutionOutcome::Substituted {
                key: ActionKey::Retreat,
                ..
            }
        ));
        assert_eq!(host.action(moved.id).path, Some(PathRevision::Consumed));
    }

    #[test]
    fn test_substitution_with_stale_path_uses_start() {
        let settings = swap_settings();
        let mut host = FakeHost::new();
        host.can_process = false;
        host.processed_end = Vec3::new(5.0, 0.0, 5.0);
        host.queue(ActionKey::Move, 0.0, Some(PathRevision::Changed));
        let eject = host.queue(ActionKey::Eject, 5.0, None);
        let unit = player_at(30.0, 5.0);

        assert_eq!(
            run_substitution(&settings, &mut host, &unit, &eject),
            SubstitutionOutcome::AlreadyCorrect
        );
    }
}
