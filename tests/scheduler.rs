mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_signal_light::{Iterations, Scheduler, SchedulerError, TaskSpec};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Job {
        Tick,
        Burst,
        Other,
    }

    fn periodic(id: Job, period_ms: u64) -> TaskSpec<Job> {
        TaskSpec {
            id,
            period: Duration::from_millis(period_ms),
            iterations: Iterations::Forever,
            enabled: true,
        }
    }

    fn burst(count: u32) -> TaskSpec<Job> {
        TaskSpec {
            id: Job::Burst,
            period: Duration::from_millis(167),
            iterations: Iterations::Bounded(count),
            enabled: false,
        }
    }

    fn ms(value: u64) -> Instant {
        Instant::from_millis(value)
    }

    #[test]
    fn test_enabled_task_runs_on_first_pass() {
        let mut scheduler = Scheduler::<Job, 2>::new();
        scheduler.add(periodic(Job::Tick, 100)).unwrap();

        let mut runs = 0;
        scheduler.execute(ms(0), |_, _, _| runs += 1);
        assert_eq!(runs, 1);

        scheduler.execute(ms(50), |_, _, _| runs += 1);
        assert_eq!(runs, 1);

        scheduler.execute(ms(100), |_, _, _| runs += 1);
        assert_eq!(runs, 2);
    }

    #[test]
    fn test_missed_periods_are_skipped() {
        let mut scheduler = Scheduler::<Job, 2>::new();
        scheduler.add(periodic(Job::Tick, 100)).unwrap();
        scheduler.execute(ms(0), |_, _, _| {});

        // Ten periods late: one run, no replay
        assert_eq!(scheduler.execute(ms(1000), |_, _, _| {}), 1);
        assert_eq!(scheduler.execute(ms(1001), |_, _, _| {}), 0);
        assert_eq!(scheduler.execute(ms(1099), |_, _, _| {}), 0);
        assert_eq!(scheduler.execute(ms(1100), |_, _, _| {}), 1);
        assert_eq!(scheduler.run_count(Job::Tick), 3);
    }

    #[test]
    fn test_tasks_run_in_registration_order() {
        let mut scheduler = Scheduler::<Job, 3>::new();
        scheduler.add(periodic(Job::Other, 10)).unwrap();
        scheduler.add(periodic(Job::Tick, 10)).unwrap();

        let mut order = Vec::new();
        scheduler.execute(ms(0), |_, job, _| order.push(job));
        assert_eq!(order, [Job::Other, Job::Tick]);
    }

    #[test]
    fn test_bounded_task_runs_exact_count() {
        let mut scheduler = Scheduler::<Job, 2>::new();
        scheduler.add(burst(6)).unwrap();
        scheduler.restart(Job::Burst);

        let mut iterations = Vec::new();
        for t in (0..3000).step_by(10) {
            scheduler.execute(ms(t), |scheduler, job, iteration| {
                assert_eq!(job, Job::Burst);
                assert_eq!(scheduler.is_last_iteration(Job::Burst), iteration.last);
                iterations.push(iteration);
            });
        }

        assert_eq!(iterations.len(), 6);
        assert_eq!(iterations.iter().filter(|it| it.last).count(), 1);
        assert!(iterations[5].last);
        assert_eq!(iterations[5].count, 6);
        assert!(!scheduler.is_enabled(Job::Burst));
        assert!(!scheduler.is_last_iteration(Job::Burst));
    }

    #[test]
    fn test_restart_resets_budget() {
        let mut scheduler = Scheduler::<Job, 2>::new();
        scheduler.add(burst(3)).unwrap();
        scheduler.restart(Job::Burst);

        scheduler.execute(ms(0), |_, _, _| {});
        scheduler.execute(ms(200), |_, _, _| {});
        assert_eq!(scheduler.run_count(Job::Burst), 2);

        scheduler.restart(Job::Burst);
        let mut runs = 0;
        for t in (400..2000).step_by(10) {
            runs += scheduler.execute(ms(t), |_, _, _| {});
        }
        assert_eq!(runs, 3);
    }

    #[test]
    fn test_callback_can_restart_later_task() {
        let mut scheduler = Scheduler::<Job, 2>::new();
        scheduler.add(periodic(Job::Tick, 100)).unwrap();
        scheduler.add(burst(2)).unwrap();

        let mut order = Vec::new();
        scheduler.execute(ms(0), |scheduler, job, _| {
            order.push(job);
            if job == Job::Tick {
                scheduler.restart(Job::Burst);
            }
        });
        assert_eq!(order, [Job::Tick, Job::Burst]);
    }

    #[test]
    fn test_enable_and_disable_are_idempotent() {
        let mut scheduler = Scheduler::<Job, 2>::new();
        scheduler.add(periodic(Job::Tick, 100)).unwrap();
        scheduler.execute(ms(0), |_, _, _| {});

        // Enabling an enabled task keeps its schedule
        scheduler.enable(Job::Tick);
        assert_eq!(scheduler.execute(ms(50), |_, _, _| {}), 0);

        scheduler.disable(Job::Tick);
        scheduler.disable(Job::Tick);
        assert!(!scheduler.is_enabled(Job::Tick));
        assert_eq!(scheduler.execute(ms(500), |_, _, _| {}), 0);

        // Re-enabled tasks are due at once
        scheduler.enable(Job::Tick);
        assert_eq!(scheduler.execute(ms(510), |_, _, _| {}), 1);
    }

    #[test]
    fn test_add_rejects_duplicates_and_overflow() {
        let mut scheduler = Scheduler::<Job, 2>::new();
        scheduler.add(periodic(Job::Tick, 100)).unwrap();
        assert_eq!(
            scheduler.add(periodic(Job::Tick, 50)),
            Err(SchedulerError::Duplicate)
        );
        scheduler.add(periodic(Job::Other, 100)).unwrap();
        assert_eq!(scheduler.add(burst(1)), Err(SchedulerError::Full));
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_set_period_applies_to_next_check() {
        let mut scheduler = Scheduler::<Job, 1>::new();
        scheduler.add(periodic(Job::Tick, 100)).unwrap();
        scheduler.execute(ms(0), |_, _, _| {});

        scheduler.set_period(Job::Tick, Duration::from_millis(300));
        assert_eq!(scheduler.execute(ms(100), |_, _, _| {}), 0);
        assert_eq!(scheduler.execute(ms(300), |_, _, _| {}), 1);
        assert_eq!(scheduler.run_count(Job::Tick), 2);
    }

    #[test]
    fn test_enable_keeps_remaining_iterations() {
        let mut scheduler = Scheduler::<Job, 1>::new();
        scheduler.add(burst(3)).unwrap();

        let mut runs = 0;
        scheduler.enable(Job::Burst);
        scheduler.execute(ms(0), |_, _, _| runs += 1);
        scheduler.execute(ms(170), |_, _, _| runs += 1);
        assert_eq!(runs, 2);

        scheduler.disable(Job::Burst);
        scheduler.enable(Job::Burst);
        let mut last = false;
        scheduler.execute(ms(200), |_, _, iteration| {
            runs += 1;
            last = iteration.last;
        });
        assert_eq!(runs, 3);
        assert!(last);
        assert!(!scheduler.is_enabled(Job::Burst));

        // Budget used up: enable is not a restart
        scheduler.enable(Job::Burst);
        assert!(!scheduler.is_enabled(Job::Burst));
        assert_eq!(scheduler.execute(ms(1000), |_, _, _| {}), 0);

        scheduler.restart(Job::Burst);
        assert_eq!(scheduler.execute(ms(1010), |_, _, _| {}), 1);
    }
}
