//! End-to-end behaviour of the harness.

mod common;

use common::{at, Sphere};
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;
use u_metalab::algorithm::{
    EpochAlgorithm, EpochStrategy, HillClimber, RandomSearch, RunConfig, RunState,
};
use u_metalab::analysis::{
    KruskalWallis, MannWhitneyU, RankSumComparison, RunStatisticSummary, StatisticalComparison,
};
use u_metalab::batch::{BatchConfig, BatchRunner};
use u_metalab::error::{AnalysisError, HarnessError, HarnessResult};
use u_metalab::observer::{
    BestScoreProbe, ConvergenceProbe, Evaluator, EventBus, MaxEpochs, MaxEvaluations, Measurement,
    Observer, OptimumLocated, Probe, RunInfo, StopCondition, TargetScore,
};
use u_metalab::problem::{Problem, Solution};

// ---- Scenario A: orientation ----

#[test]
fn test_minimizing_problem_prefers_lower_score() {
    let p = Sphere::new(2);
    let mut x = at(&[2.0, 1.0]);
    let mut y = at(&[1.0, 1.414_213_562_373_095_1]);
    assert_eq!(p.evaluate(&mut x).unwrap(), 5.0);
    assert!((p.evaluate(&mut y).unwrap() - 3.0).abs() < 1e-12);

    assert!(p.is_better_solution(&y, &x).unwrap());
    assert!(!p.is_better_solution(&x, &y).unwrap());
}

#[test]
fn test_maximizing_problem_prefers_higher_score() {
    let p = Sphere::negated(2);
    assert!(p.is_better(-3.0, -5.0));
    assert!(!p.is_better(-5.0, -3.0));
}

// ---- Scenario B: optimum located ----

#[test]
fn test_optimum_located_only_after_exact_match() {
    let p = Sphere::new(2);
    let mut bus: EventBus<Sphere> = EventBus::new();
    bus.register_stop_condition(Box::new(OptimumLocated::<Vec<f64>>::new()));
    bus.initialise(
        &p,
        &RunInfo {
            algorithm: "manual",
            seed: 0,
        },
    )
    .unwrap();

    let mut stops = Vec::new();
    for point in [[1.0, 1.0], [0.5, 0.5], [0.0, 0.0]] {
        let mut solution = at(&point);
        Evaluator::new(&p, &mut bus).evaluate(&mut solution).unwrap();
        stops.push(bus.first_satisfied().is_some());
    }
    assert_eq!(stops, vec![false, false, true]);
}

// ---- Scenario C: separated vs overlapping ----

#[test]
fn test_separated_runs_reject_null_hypothesis() {
    let a = RunStatisticSummary::new("a", vec![10.0, 12.0, 9.0, 11.0], true);
    let separated = RunStatisticSummary::new("b", vec![20.0, 22.0, 19.0, 21.0], true);
    let overlapping = RunStatisticSummary::new("c", vec![10.1, 11.9, 9.2, 10.8], true);

    let mut comparison = StatisticalComparison::new(MannWhitneyU);
    comparison.evaluate(&a, &separated).unwrap();
    assert!(comparison.can_reject_null_hypothesis());

    comparison.evaluate(&a, &overlapping).unwrap();
    assert!(!comparison.can_reject_null_hypothesis());
}

#[test]
fn test_rank_sum_uses_pairwise_statistic_for_two_summaries() {
    let a = RunStatisticSummary::new("a", vec![10.0, 12.0, 9.0, 11.0], true);
    let b = RunStatisticSummary::new("b", vec![20.0, 22.0, 19.0, 21.0], true);

    let mut rank_sum = StatisticalComparison::new(RankSumComparison);
    let mut mann_whitney = StatisticalComparison::new(MannWhitneyU);
    rank_sum.evaluate_all(&[&a, &b]).unwrap();
    mann_whitney.evaluate(&a, &b).unwrap();
    assert_eq!(rank_sum.p_value(), mann_whitney.p_value());
}

// ---- Scenario D: N populations ----

#[test]
fn test_three_summaries_on_pairwise_test_fail() {
    let a = RunStatisticSummary::new("a", vec![1.0, 2.0], true);
    let b = RunStatisticSummary::new("b", vec![3.0, 4.0], true);
    let c = RunStatisticSummary::new("c", vec![5.0, 6.0], true);

    let mut comparison = StatisticalComparison::new(MannWhitneyU);
    assert!(!comparison.supports_n_populations());
    let err = comparison.evaluate_all(&[&a, &b, &c]).unwrap_err();
    assert!(matches!(err, AnalysisError::NPopulationsUnsupported { count: 3, .. }));
    assert!(comparison.p_value().is_none());
}

#[test]
fn test_three_summaries_on_n_population_test() {
    let a = RunStatisticSummary::new("a", vec![1.0, 2.0, 3.0], true);
    let b = RunStatisticSummary::new("b", vec![4.0, 5.0, 6.0], true);
    let c = RunStatisticSummary::new("c", vec![7.0, 8.0, 9.0], true);

    let mut comparison = StatisticalComparison::new(KruskalWallis);
    let outcome = comparison.evaluate_all(&[&a, &b, &c]).unwrap();
    assert_eq!(outcome.populations, 3);
    assert!(comparison.can_reject_null_hypothesis());
}

// ---- Scenario E: strategy failure mid-epoch ----

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Evaluated,
    EpochComplete(usize),
}

struct Recorder {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Observer<Sphere> for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn solution_evaluated(&mut self, _: &Sphere, _: &Solution<Vec<f64>>) -> HarnessResult<()> {
        self.events.borrow_mut().push(Event::Evaluated);
        Ok(())
    }

    fn epoch_complete(
        &mut self,
        _: &Sphere,
        epoch: usize,
        _: &[Solution<Vec<f64>>],
    ) -> HarnessResult<()> {
        self.events.borrow_mut().push(Event::EpochComplete(epoch));
        Ok(())
    }

    fn reset(&mut self) {
        self.events.borrow_mut().clear();
    }
}

impl Probe<Sphere> for Recorder {
    fn measurement(&self) -> Measurement {
        Measurement::Scalar(self.events.borrow().len() as f64)
    }
}

/// Generates ten candidates per epoch and fails on the fifth of epoch 2.
struct Faulty {
    epoch: usize,
}

impl EpochStrategy<Sphere> for Faulty {
    fn name(&self) -> &str {
        "faulty"
    }

    fn initialise<R: Rng>(
        &mut self,
        problem: &Sphere,
        rng: &mut R,
    ) -> HarnessResult<Vec<Solution<Vec<f64>>>> {
        self.epoch = 0;
        Ok((0..10).map(|_| problem.random_solution(rng)).collect())
    }

    fn execute_epoch<R: Rng>(
        &mut self,
        _population: &[Solution<Vec<f64>>],
        rng: &mut R,
        evaluator: &mut Evaluator<'_, Sphere>,
    ) -> HarnessResult<Vec<Solution<Vec<f64>>>> {
        self.epoch += 1;
        let mut next = Vec::with_capacity(10);
        for k in 1..=10 {
            if self.epoch == 2 && k == 5 {
                return Err(HarnessError::strategy("faulty", "candidate 5 could not be built"));
            }
            next.push(evaluator.random_evaluated(rng)?);
        }
        Ok(next)
    }
}

#[test]
fn test_strategy_failure_mid_epoch_aborts_run() {
    let p = Sphere::new(2);
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut alg = EpochAlgorithm::new(Faulty { epoch: 0 }, RunConfig::default().with_seed(5))
        .with_stop_condition(MaxEpochs::new(10))
        .with_probe(Recorder {
            events: Rc::clone(&events),
        });

    let err = alg.run(&p).unwrap_err();
    assert!(matches!(err, HarnessError::Strategy { .. }));
    assert_eq!(alg.state(), RunState::Stopped);

    let events = events.borrow();
    let last_boundary = events
        .iter()
        .rposition(|e| *e == Event::EpochComplete(1))
        .unwrap();
    let after: Vec<&Event> = events[last_boundary + 1..].iter().collect();
    assert_eq!(after.len(), 4);
    assert!(after.iter().all(|e| **e == Event::Evaluated));
    assert!(!events.contains(&Event::EpochComplete(2)));
}

// ---- Full pipeline ----

#[test]
fn test_run_until_optimum_or_budget() {
    let p = Sphere::new(2);
    let outcome = EpochAlgorithm::new(HillClimber::new(8), RunConfig::default().with_seed(17))
        .with_stop_condition(TargetScore::new(1e-3))
        .with_stop_condition(MaxEvaluations::new(20_000))
        .with_probe(BestScoreProbe::new())
        .with_probe(ConvergenceProbe::new())
        .run(&p)
        .unwrap();

    assert!(outcome.stop_reason.index <= 1);
    let series = outcome.measurement("convergence").unwrap().as_series().unwrap();
    assert_eq!(series.len(), outcome.epochs);
    assert!(series.windows(2).all(|w| w[1] <= w[0]));
    assert!(outcome.measurement("best-score").unwrap().as_scalar().unwrap() <= outcome.best_score);
}

#[test]
fn test_more_budget_is_detectably_better() {
    let p = Sphere::new(2);

    let weak = BatchRunner::run(
        &p,
        &BatchConfig::default().with_runs(10).with_base_seed(1),
        |_, run| EpochAlgorithm::new(RandomSearch::new(2), run).with_stop_condition(MaxEpochs::new(5)),
    )
    .unwrap()
    .summary("weak");

    let strong = BatchRunner::run(
        &p,
        &BatchConfig::default().with_runs(10).with_base_seed(2),
        |_, run| {
            EpochAlgorithm::new(RandomSearch::new(50), run).with_stop_condition(MaxEpochs::new(50))
        },
    )
    .unwrap()
    .summary("strong");

    assert!(strong.mean().unwrap() < weak.mean().unwrap());

    let mut comparison = StatisticalComparison::new(MannWhitneyU);
    comparison.evaluate(&weak, &strong).unwrap();
    assert!(comparison.is_populations_different());
}

#[test]
fn test_batch_is_reproducible() {
    let p = Sphere::negated(3);
    let config = BatchConfig::default().with_runs(4).with_base_seed(99);
    let build = |_: usize, run: RunConfig| -> EpochAlgorithm<Sphere, HillClimber<Vec<f64>>> {
        EpochAlgorithm::new(HillClimber::new(5), run).with_stop_condition(MaxEpochs::new(20))
    };

    let first = BatchRunner::run(&p, &config, build).unwrap();
    let second = BatchRunner::run(&p, &config, build).unwrap();
    assert_eq!(first.best_scores(), second.best_scores());
    assert!(first.best_scores().iter().all(|s| *s <= 0.0));
}

#[test]
fn test_stop_condition_trait_objects_are_reusable() {
    let p = Sphere::new(2);
    let mut condition = MaxEvaluations::new(2);
    Observer::<Sphere>::initialise_before_run(
        &mut condition,
        &p,
        &RunInfo {
            algorithm: "manual",
            seed: 0,
        },
    )
    .unwrap();

    let mut solution = at(&[1.0, 0.0]);
    p.evaluate(&mut solution).unwrap();
    for _ in 0..2 {
        condition.solution_evaluated(&p, &solution).unwrap();
    }
    assert!(StopCondition::<Sphere>::must_stop(&condition));

    Observer::<Sphere>::reset(&mut condition);
    assert!(!StopCondition::<Sphere>::must_stop(&condition));
}
