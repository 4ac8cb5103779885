//! 控制器模块
//!
//! 把三个小工具的状态机、store 和同步镜像接到一起：
//! 所有变更都从这里走，变更后登记防抖的自动同步

pub mod debounce;
pub mod status;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;

use crate::config::AppConfig;
use crate::mirror::{mirror_from_config, RemoteMirror, SyncOutcome};
use crate::state::{
    load_cleaners, load_history, load_line_leader, parse_required, pick_random_name,
    sync_cleaners, sync_line_leader, Advance, PairPicker, Rotation, StateError,
};
use crate::store::{keys, LocalStore};

pub use debounce::{Clock, Debouncer, SystemClock};
pub use status::{StatusCell, SyncStatus};

/// 带同步快照的功能
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    LineLeader,
    Cleaners,
}

impl Feature {
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::LineLeader => "line leader",
            Feature::Cleaners => "cleaners",
        }
    }
}

/// 控制器
///
/// 单线程持有全部可变状态；同一个状态对象不存在并发变更。
/// 每个功能一个防抖句柄和一个状态格子，互不影响
pub struct Controller<C: Clock> {
    store: LocalStore,
    config: AppConfig,
    mirror: Option<Box<dyn RemoteMirror>>,
    line_leader: Rotation,
    cleaners: PairPicker,
    leader_auto: Debouncer<C>,
    cleaners_auto: Debouncer<C>,
    leader_status: StatusCell<C>,
    cleaners_status: StatusCell<C>,
}

impl Controller<SystemClock> {
    /// 打开工作目录：读配置、建镜像、恢复两份状态（远端优先，本地兜底）
    pub fn open(workspace_root: &Path) -> Result<Self> {
        let store = LocalStore::open(workspace_root)?;
        let config = AppConfig::load(&store);
        let mirror = mirror_from_config(config.remote.as_ref());
        Ok(Self::assemble(store, config, mirror, SystemClock))
    }
}

impl<C: Clock + Clone> Controller<C> {
    /// 用给定部件组装控制器（测试注入假时钟/假镜像从这里进）
    pub fn assemble(
        store: LocalStore,
        config: AppConfig,
        mirror: Option<Box<dyn RemoteMirror>>,
        clock: C,
    ) -> Self {
        let line_leader = load_line_leader(&store, mirror.as_deref()).unwrap_or_default();
        let cleaners = load_cleaners(&store, mirror.as_deref())
            .unwrap_or_else(|| PairPicker::with_history(load_history(&store)));

        let window = Duration::from_millis(config.debounce_ms);
        let hold = Duration::from_millis(config.status_hold_ms);

        Self {
            line_leader,
            cleaners,
            leader_auto: Debouncer::new(clock.clone(), window),
            cleaners_auto: Debouncer::new(clock.clone(), window),
            leader_status: StatusCell::new(clock.clone(), hold),
            cleaners_status: StatusCell::new(clock, hold),
            store,
            config,
            mirror,
        }
    }
}

impl<C: Clock> Controller<C> {
    // ═══════════════════════════════════════════════════════════════
    // 名单维护
    // ═══════════════════════════════════════════════════════════════

    /// 保存随机点名的名单原文
    pub fn save_picker_roster(&mut self, text: &str) -> Result<()> {
        self.store.put(keys::SAVED_NAMES, text)
    }

    /// 保存排队领队的名单原文
    pub fn save_leader_roster(&mut self, text: &str) -> Result<()> {
        self.store.put(keys::SAVED_LINE_LEADER_NAMES, text)
    }

    /// 保存值日生的名单原文
    ///
    /// 配置了 resetCleanersOnEdit 时顺带清掉当前的一对并登记同步
    pub fn save_cleaners_roster(&mut self, text: &str) -> Result<()> {
        self.store.put(keys::SAVED_CLEANERS_NAMES, text)?;
        self.notify_cleaners_roster_edited();
        Ok(())
    }

    /// 值日生名单在 store 里被外部改写时的策略入口（watch 模式）
    pub fn notify_cleaners_roster_edited(&mut self) {
        if self.config.reset_cleaners_on_edit && self.cleaners.is_active() {
            self.cleaners.deactivate();
            self.cleaners_auto.schedule();
        }
    }

    pub fn picker_roster_text(&self) -> String {
        self.store.get(keys::SAVED_NAMES).unwrap_or_default()
    }

    pub fn leader_roster_text(&self) -> String {
        self.store
            .get(keys::SAVED_LINE_LEADER_NAMES)
            .unwrap_or_default()
    }

    pub fn cleaners_roster_text(&self) -> String {
        self.store
            .get(keys::SAVED_CLEANERS_NAMES)
            .unwrap_or_default()
    }

    // ═══════════════════════════════════════════════════════════════
    // 三个工具的操作入口
    // ═══════════════════════════════════════════════════════════════

    /// 随机点一个名字（无状态，不参与同步）
    pub fn pick_name<R: Rng>(&self, rng: &mut R) -> Result<String, StateError> {
        let names = parse_required(&self.picker_roster_text())?;
        pick_random_name(&names, rng).map(String::from)
    }

    /// 用保存的名单开启新的一轮排队
    pub fn start_line_leader(&mut self) -> Result<&Rotation, StateError> {
        let names = parse_required(&self.leader_roster_text())?;
        self.line_leader = Rotation::start(names)?;
        self.leader_auto.schedule();
        Ok(&self.line_leader)
    }

    /// 轮到下一个人
    pub fn next_person(&mut self) -> Result<Advance, StateError> {
        let advance = self.line_leader.advance()?;
        self.leader_auto.schedule();
        Ok(advance)
    }

    /// 手动跳到指定的人
    pub fn select_person(&mut self, index: usize) -> Result<(), StateError> {
        self.line_leader.select(index)?;
        self.leader_auto.schedule();
        Ok(())
    }

    /// 抽一对值日生
    pub fn pick_cleaners<R: Rng>(&mut self, rng: &mut R) -> Result<[String; 2], StateError> {
        let names = parse_required(&self.cleaners_roster_text())?;
        let pair = self.cleaners.pick(names, rng)?.clone();
        self.cleaners_auto.schedule();
        Ok(pair)
    }

    // ═══════════════════════════════════════════════════════════════
    // 同步
    // ═══════════════════════════════════════════════════════════════

    /// 显式同步：跳过防抖立即推送，并更新状态格子
    pub fn sync_now(&mut self, feature: Feature) -> SyncOutcome {
        self.status_cell_mut(feature)
            .set(SyncStatus::Syncing, "Syncing...");

        let outcome = self.push_feature(feature);
        // 刚推完，挂起的自动同步没有存在的必要了
        self.debouncer_mut(feature).cancel();

        let (status, message) = match &outcome {
            SyncOutcome::Synced => (
                SyncStatus::Success,
                format!("Synced at {}", chrono::Local::now().format("%H:%M:%S")),
            ),
            SyncOutcome::OfflineSavedLocally => {
                (SyncStatus::Error, "Offline - Saved locally".to_string())
            }
            SyncOutcome::Error(e) => (SyncStatus::Error, format!("Sync failed: {}", e)),
        };
        self.status_cell_mut(feature).set(status, message);

        outcome
    }

    /// 推进时间片：到期的自动同步静默执行（不动状态格子）
    pub fn tick(&mut self) -> Vec<(Feature, SyncOutcome)> {
        let mut fired = Vec::new();
        if self.leader_auto.fire_if_due() {
            fired.push((Feature::LineLeader, self.push_feature(Feature::LineLeader)));
        }
        if self.cleaners_auto.fire_if_due() {
            fired.push((Feature::Cleaners, self.push_feature(Feature::Cleaners)));
        }
        fired
    }

    /// 进程收尾：把挂起的自动同步立刻冲掉，不再等静默窗口
    pub fn flush(&mut self) -> Vec<(Feature, SyncOutcome)> {
        let mut fired = Vec::new();
        if self.leader_auto.fire_now() {
            fired.push((Feature::LineLeader, self.push_feature(Feature::LineLeader)));
        }
        if self.cleaners_auto.fire_now() {
            fired.push((Feature::Cleaners, self.push_feature(Feature::Cleaners)));
        }
        fired
    }

    fn push_feature(&mut self, feature: Feature) -> SyncOutcome {
        // 快照在这一刻捕获：后续变更不影响已发出的这份
        match feature {
            Feature::LineLeader => {
                sync_line_leader(&self.store, self.mirror.as_deref(), &self.line_leader)
            }
            Feature::Cleaners => {
                sync_cleaners(&self.store, self.mirror.as_deref(), &self.cleaners)
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // 查询
    // ═══════════════════════════════════════════════════════════════

    pub fn line_leader(&self) -> &Rotation {
        &self.line_leader
    }

    pub fn cleaners(&self) -> &PairPicker {
        &self.cleaners
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn mirror_description(&self) -> Option<String> {
        self.mirror.as_ref().map(|m| m.describe())
    }

    pub fn sync_status(&self, feature: Feature) -> SyncStatus {
        self.status_cell(feature).current()
    }

    pub fn sync_message(&self, feature: Feature) -> Option<&str> {
        self.status_cell(feature).message()
    }

    pub fn auto_sync_pending(&self, feature: Feature) -> bool {
        match feature {
            Feature::LineLeader => self.leader_auto.is_pending(),
            Feature::Cleaners => self.cleaners_auto.is_pending(),
        }
    }

    fn status_cell(&self, feature: Feature) -> &StatusCell<C> {
        match feature {
            Feature::LineLeader => &self.leader_status,
            Feature::Cleaners => &self.cleaners_status,
        }
    }

    fn status_cell_mut(&mut self, feature: Feature) -> &mut StatusCell<C> {
        match feature {
            Feature::LineLeader => &mut self.leader_status,
            Feature::Cleaners => &mut self.cleaners_status,
        }
    }

    fn debouncer_mut(&mut self, feature: Feature) -> &mut Debouncer<C> {
        match feature {
            Feature::LineLeader => &mut self.leader_auto,
            Feature::Cleaners => &mut self.cleaners_auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::debounce::testing::FakeClock;
    use super::*;
    use crate::mirror::testing::MemoryMirror;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;
    use tempfile::TempDir;

    fn controller(
        config: AppConfig,
        mirror: Option<Box<dyn RemoteMirror>>,
    ) -> (TempDir, FakeClock, Controller<FakeClock>) {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::init(temp.path(), false).unwrap();
        let clock = FakeClock::new();
        let ctrl = Controller::assemble(store, config, mirror, clock.clone());
        (temp, clock, ctrl)
    }

    #[test]
    fn test_start_and_walk_rotation() {
        let (_temp, _clock, mut ctrl) = controller(AppConfig::default(), None);
        ctrl.save_leader_roster("A\nB\nC").unwrap();

        ctrl.start_line_leader().unwrap();
        assert_eq!(ctrl.line_leader().current_name(), Some("A"));

        assert_eq!(ctrl.next_person().unwrap(), Advance::Moved(1));
        assert_eq!(ctrl.next_person().unwrap(), Advance::Moved(2));
        assert_eq!(ctrl.next_person().unwrap(), Advance::CycleComplete);
        assert!(!ctrl.line_leader().is_active());
    }

    #[test]
    fn test_start_without_roster_is_validation_error() {
        let (_temp, _clock, mut ctrl) = controller(AppConfig::default(), None);
        assert_eq!(ctrl.start_line_leader().unwrap_err(), StateError::NoValidNames);
        // 状态不变、也没有登记自动同步
        assert!(!ctrl.auto_sync_pending(Feature::LineLeader));
    }

    #[test]
    fn test_mutations_coalesce_into_one_push() {
        let (_temp, clock, mut ctrl) = controller(AppConfig::default(), None);
        ctrl.save_leader_roster("A\nB\nC").unwrap();

        // 1 秒内的三次变更只换来一次推送，窗口从最后一次起算
        ctrl.start_line_leader().unwrap();
        clock.advance(Duration::from_millis(500));
        ctrl.next_person().unwrap();
        clock.advance(Duration::from_millis(500));
        ctrl.next_person().unwrap();

        clock.advance(Duration::from_millis(1999));
        assert!(ctrl.tick().is_empty());

        clock.advance(Duration::from_millis(1));
        let fired = ctrl.tick();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, Feature::LineLeader);

        // 推送的是最后一次变更之后的快照
        let json = ctrl.store().get(crate::store::keys::LINE_LEADER_STATE).unwrap();
        assert!(json.contains("\"currentIndex\":2"));
    }

    #[test]
    fn test_explicit_sync_bypasses_debounce() {
        let mirror = MemoryMirror::new();
        let remote = mirror.data();
        let (_temp, _clock, mut ctrl) =
            controller(AppConfig::default(), Some(Box::new(mirror)));

        ctrl.save_leader_roster("A\nB").unwrap();
        ctrl.start_line_leader().unwrap();
        assert!(ctrl.auto_sync_pending(Feature::LineLeader));

        let outcome = ctrl.sync_now(Feature::LineLeader);
        assert_eq!(outcome, SyncOutcome::Synced);
        assert!(remote.borrow().contains_key("lineLeaderState"));

        // 显式同步清掉了挂起的自动同步
        assert!(!ctrl.auto_sync_pending(Feature::LineLeader));
        assert_eq!(ctrl.sync_status(Feature::LineLeader), SyncStatus::Success);
    }

    #[test]
    fn test_offline_sync_shows_error_then_decays() {
        let (_temp, clock, mut ctrl) =
            controller(AppConfig::default(), Some(Box::new(MemoryMirror::failing())));

        ctrl.save_cleaners_roster("A\nB\nC").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        ctrl.pick_cleaners(&mut rng).unwrap();

        let outcome = ctrl.sync_now(Feature::Cleaners);
        assert_eq!(outcome, SyncOutcome::OfflineSavedLocally);
        assert_eq!(ctrl.sync_status(Feature::Cleaners), SyncStatus::Error);
        assert_eq!(
            ctrl.sync_message(Feature::Cleaners),
            Some("Offline - Saved locally")
        );

        // 终态 3 秒后消退
        clock.advance(Duration::from_secs(3));
        assert_eq!(ctrl.sync_status(Feature::Cleaners), SyncStatus::Idle);
    }

    #[test]
    fn test_features_debounce_independently() {
        let (_temp, clock, mut ctrl) = controller(AppConfig::default(), None);
        ctrl.save_leader_roster("A\nB").unwrap();
        ctrl.save_cleaners_roster("A\nB\nC").unwrap();

        ctrl.start_line_leader().unwrap();
        clock.advance(Duration::from_secs(1));

        let mut rng = StdRng::seed_from_u64(9);
        ctrl.pick_cleaners(&mut rng).unwrap();

        // 领队的窗口先到
        clock.advance(Duration::from_secs(1));
        let fired = ctrl.tick();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, Feature::LineLeader);

        clock.advance(Duration::from_secs(1));
        let fired = ctrl.tick();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, Feature::Cleaners);
    }

    #[test]
    fn test_flush_fires_pending_immediately() {
        let (_temp, _clock, mut ctrl) = controller(AppConfig::default(), None);
        ctrl.save_leader_roster("A\nB").unwrap();
        ctrl.start_line_leader().unwrap();

        let fired = ctrl.flush();
        assert_eq!(fired.len(), 1);
        assert!(ctrl.store().get(crate::store::keys::LINE_LEADER_STATE).is_some());

        // 没有挂起任务时 flush 是空操作
        assert!(ctrl.flush().is_empty());
    }

    #[test]
    fn test_reset_cleaners_on_edit_when_configured() {
        let config = AppConfig {
            reset_cleaners_on_edit: true,
            ..AppConfig::default()
        };
        let (_temp, _clock, mut ctrl) = controller(config, None);

        ctrl.save_cleaners_roster("A\nB\nC").unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        ctrl.pick_cleaners(&mut rng).unwrap();
        assert!(ctrl.cleaners().is_active());

        ctrl.save_cleaners_roster("A\nB\nC\nD").unwrap();
        assert!(!ctrl.cleaners().is_active());
        assert!(ctrl.auto_sync_pending(Feature::Cleaners));
    }

    #[test]
    fn test_default_keeps_cleaners_active_on_edit() {
        let (_temp, _clock, mut ctrl) = controller(AppConfig::default(), None);

        ctrl.save_cleaners_roster("A\nB\nC").unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        ctrl.pick_cleaners(&mut rng).unwrap();

        ctrl.save_cleaners_roster("A\nB").unwrap();
        assert!(ctrl.cleaners().is_active());
    }

    #[test]
    fn test_state_restored_on_reopen() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::init(temp.path(), false).unwrap();

        {
            let mut ctrl = Controller::assemble(
                store.clone(),
                AppConfig::default(),
                None,
                FakeClock::new(),
            );
            ctrl.save_leader_roster("A\nB\nC").unwrap();
            ctrl.start_line_leader().unwrap();
            ctrl.next_person().unwrap();
            ctrl.flush();
        }

        // 新控制器从 store 恢复到同一位置
        let ctrl = Controller::assemble(store, AppConfig::default(), None, FakeClock::new());
        assert_eq!(ctrl.line_leader().current_index(), Some(1));
    }

    #[test]
    fn test_pick_name_from_saved_roster() {
        let (_temp, _clock, mut ctrl) = controller(AppConfig::default(), None);
        assert_eq!(
            ctrl.pick_name(&mut StdRng::seed_from_u64(1)).unwrap_err(),
            StateError::NoValidNames
        );

        ctrl.save_picker_roster("Alice\nBob").unwrap();
        let name = ctrl.pick_name(&mut StdRng::seed_from_u64(1)).unwrap();
        assert!(name == "Alice" || name == "Bob");
    }
}
