use docuquiz::attempt::{QuizAttempt, TimedAttempt};
use docuquiz::models::question::QuizQuestion;
use docuquiz::scheduler::{ScheduleHandle, Scheduler, TokioScheduler};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Tick = Box<dyn FnMut() -> bool + Send>;

/// Test clock: ticks fire only when the test says so.
#[derive(Default)]
struct ManualScheduler {
    schedules: Mutex<Vec<(Tick, Arc<AtomicBool>)>>,
}

impl ManualScheduler {
    fn fire(&self) {
        let mut schedules = self.schedules.lock().unwrap();
        schedules.retain_mut(|(tick, cancelled)| {
            if cancelled.load(Ordering::SeqCst) {
                return false;
            }
            tick()
        });
    }

    fn active(&self) -> usize {
        self.schedules
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, cancelled)| !cancelled.load(Ordering::SeqCst))
            .count()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, _period: Duration, tick: Tick) -> ScheduleHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.schedules
            .lock()
            .unwrap()
            .push((tick, Arc::clone(&cancelled)));
        ScheduleHandle::new(move || cancelled.store(true, Ordering::SeqCst))
    }
}

fn questions() -> Vec<QuizQuestion> {
    vec![QuizQuestion {
        id: 1,
        question: "Q?".into(),
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_answer_index: 2,
    }]
}

#[test]
fn scheduled_ticks_run_the_countdown_down_to_auto_submit() {
    let scheduler = ManualScheduler::default();
    let timed = TimedAttempt::start(QuizAttempt::new(questions(), 1), &scheduler);

    for _ in 0..59 {
        scheduler.fire();
    }
    assert!(!timed.is_submitted());
    assert_eq!(timed.time_left_seconds(), 1);

    scheduler.fire();
    assert!(timed.is_submitted());
    assert_eq!(timed.time_left_seconds(), 0);
    assert_eq!(timed.result().unwrap().score, 0);
    // The auto-submit tick retired its own schedule.
    assert_eq!(scheduler.active(), 0);

    // A stray fire after submission changes nothing.
    scheduler.fire();
    assert_eq!(timed.time_left_seconds(), 0);
}

#[test]
fn manual_submit_stops_the_clock() {
    let scheduler = ManualScheduler::default();
    let mut timed = TimedAttempt::start(QuizAttempt::new(questions(), 1), &scheduler);

    scheduler.fire();
    scheduler.fire();
    timed.select_option(1, 2);
    timed.submit();

    assert_eq!(scheduler.active(), 0);
    let frozen = timed.time_left_seconds();
    scheduler.fire();
    assert_eq!(timed.time_left_seconds(), frozen);
    assert_eq!(timed.result().unwrap().score, 1);
}

#[test]
fn retake_restarts_the_clock_with_a_fresh_schedule() {
    let scheduler = ManualScheduler::default();
    let mut timed = TimedAttempt::start(QuizAttempt::new(questions(), 2), &scheduler);

    scheduler.fire();
    timed.submit();
    assert_eq!(scheduler.active(), 0);

    timed.retake(&scheduler);
    assert!(!timed.is_submitted());
    assert_eq!(timed.time_left_seconds(), 120);
    assert_eq!(timed.progress(), 0.0);
    assert_eq!(scheduler.active(), 1);

    scheduler.fire();
    assert_eq!(timed.time_left_seconds(), 119);
}

#[test]
fn retake_before_submission_is_ignored() {
    let scheduler = ManualScheduler::default();
    let mut timed = TimedAttempt::start(QuizAttempt::new(questions(), 2), &scheduler);

    scheduler.fire();
    timed.retake(&scheduler);
    assert_eq!(timed.time_left_seconds(), 119);
    assert_eq!(scheduler.active(), 1);
}

#[test]
fn dropping_a_timed_attempt_cancels_its_schedule() {
    let scheduler = ManualScheduler::default();
    {
        let _timed = TimedAttempt::start(QuizAttempt::new(questions(), 1), &scheduler);
        assert_eq!(scheduler.active(), 1);
    }
    scheduler.fire();
    assert_eq!(scheduler.active(), 0);
}

#[tokio::test]
async fn tokio_scheduler_fires_and_cancels() {
    let scheduler = TokioScheduler;
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);

    let handle = scheduler.schedule_repeating(
        Duration::from_millis(10),
        Box::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
            true
        }),
    );

    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.cancel();
    let fired = count.load(Ordering::SeqCst);
    assert!(fired >= 2, "expected repeated ticks, got {}", fired);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(count.load(Ordering::SeqCst), fired);
}
