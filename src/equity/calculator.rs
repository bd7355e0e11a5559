//! Equity calculator.
//!
//! Two strategies over the same showdown rule:
//! - **Exact**: enumerate every live opponent assignment and board runout,
//!   weighting each assignment by the product of its combo weights.
//! - **Monte Carlo**: sample opponents jointly and deal the rest of the board,
//!   in fixed-size batches. Each batch seeds its own RNG from the calculator's
//!   master RNG, so a seeded run gives the same answer on any thread count.

use std::time::Instant;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::cards::{Board, Card, CardSet, Deck, HandEvaluator, HoleCards};
use crate::config::EquityConfig;
use crate::equity::result::{EquityMethod, EquityResult, MethodPreference, Tally};
use crate::error::{EngineError, Result};
use crate::range::WeightedRange;

/// Batches dispatched between convergence and time checks.
const BATCHES_PER_ROUND: usize = 8;

/// Joint opponent draws attempted before a trial is declared impossible.
const MAX_JOINT_ATTEMPTS: usize = 1_000;

/// An equity question: hero against one range per opponent.
#[derive(Debug, Clone)]
pub struct EquityQuery {
    /// Hero's hole cards.
    pub hero: HoleCards,
    /// Known community cards.
    pub board: Board,
    /// One range per opponent.
    pub opponents: Vec<WeightedRange>,
    /// Override of the configured Monte Carlo budget.
    pub iterations: Option<usize>,
    /// Requested method.
    pub method: MethodPreference,
}

impl EquityQuery {
    /// Hero against the given opponent ranges with default settings.
    pub fn new(hero: HoleCards, board: Board, opponents: Vec<WeightedRange>) -> Self {
        Self {
            hero,
            board,
            opponents,
            iterations: None,
            method: MethodPreference::Auto,
        }
    }

    /// Builder method: set the Monte Carlo budget.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Builder method: set the method.
    pub fn with_method(mut self, method: MethodPreference) -> Self {
        self.method = method;
        self
    }
}

/// Anything that can answer an [`EquityQuery`].
///
/// The factor engine depends on this rather than on the calculator, so
/// tests can substitute a fixed answer.
pub trait EquitySource {
    /// Estimate hero's equity.
    fn estimate(&mut self, query: &EquityQuery) -> Result<EquityResult>;
}

/// Exact and Monte Carlo equity calculator.
///
/// Owns its random source. Construct with [`EquityCalculator::seeded`] for
/// reproducible results.
///
/// # Example
/// ```
/// use qpds_engine::cards::{Board, HoleCards};
/// use qpds_engine::config::EquityConfig;
/// use qpds_engine::equity::{EquityCalculator, EquityQuery};
/// use qpds_engine::range::WeightedRange;
///
/// let mut calc = EquityCalculator::seeded(EquityConfig::default(), 42);
/// let hero = HoleCards::parse("AhAd").unwrap();
/// let board = Board::parse("Ks 7d 2c Qh").unwrap();
/// let villain = WeightedRange::parse("villain", "KK, AK").unwrap();
/// let result = calc.calculate(&EquityQuery::new(hero, board, vec![villain])).unwrap();
/// assert!(result.equity > 0.5);
/// ```
pub struct EquityCalculator<R: Rng = StdRng> {
    config: EquityConfig,
    evaluator: HandEvaluator,
    pool: Option<rayon::ThreadPool>,
    rng: R,
}

impl EquityCalculator<StdRng> {
    /// Create a calculator seeded from `config.seed`, or from entropy.
    pub fn new(config: EquityConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Create a calculator with a fixed seed.
    pub fn seeded(config: EquityConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Create a calculator seeded from entropy.
    pub fn from_entropy(config: EquityConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> EquityCalculator<R> {
    /// Create a calculator around an existing random source.
    pub fn with_rng(config: EquityConfig, rng: R) -> Self {
        let pool = match config.num_threads {
            Some(threads) if threads > 1 => {
                match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                    Ok(pool) => Some(pool),
                    Err(e) => {
                        log::warn!("Could not build {}-thread pool ({}), using the global pool", threads, e);
                        None
                    }
                }
            }
            _ => None,
        };

        Self {
            config,
            evaluator: HandEvaluator::new(),
            pool,
            rng,
        }
    }

    /// The calculator's configuration.
    pub fn config(&self) -> &EquityConfig {
        &self.config
    }

    /// Compute hero's equity against the query's opponents.
    pub fn calculate(&mut self, query: &EquityQuery) -> Result<EquityResult> {
        let start = Instant::now();
        let setup = Setup::new(query)?;

        let evaluations = setup.exact_evaluations();
        let within_bound = evaluations <= self.config.max_exact_evaluations as f64;
        let use_exact = match query.method {
            MethodPreference::Auto => within_bound,
            MethodPreference::Exact => {
                if !within_bound {
                    log::warn!(
                        "Exact enumeration needs {:.0} evaluations (limit {}), sampling instead",
                        evaluations,
                        self.config.max_exact_evaluations
                    );
                }
                within_bound
            }
            MethodPreference::MonteCarlo => false,
        };

        if use_exact {
            log::debug!("Exact enumeration over {:.0} evaluations", evaluations);
            let tally = self.enumerate(&setup);
            if tally.weight <= 0.0 {
                return Err(no_joint_assignment());
            }
            let elapsed = start.elapsed().as_millis() as u64;
            return Ok(tally.into_result(EquityMethod::Exact, true, false, elapsed));
        }

        let budget = query.iterations.unwrap_or(self.config.iterations).max(1);
        self.sample(&setup, budget, start)
    }

    /// Exhaustive enumeration, parallel over the first opponent's combos.
    fn enumerate(&self, setup: &Setup) -> Tally {
        let evaluator = self.evaluator;
        let job = || {
            setup.live[0]
                .combos()
                .par_iter()
                .map(|first| {
                    let mut assigned = Vec::with_capacity(setup.live.len());
                    assigned.push(first.combo);
                    let mut tally = Tally::default();
                    enumerate_opponents(
                        setup,
                        &evaluator,
                        1,
                        setup.dead.union(first.combo.mask()),
                        first.weight,
                        &mut assigned,
                        &mut tally,
                    );
                    tally
                })
                .collect::<Vec<_>>()
        };

        let partials = self.run(job);
        let mut total = Tally::default();
        for partial in &partials {
            total.merge(partial);
        }
        total
    }

    /// Monte Carlo sampling in rounds of seeded batches.
    fn sample(&mut self, setup: &Setup, budget: usize, start: Instant) -> Result<EquityResult> {
        let samplers = setup
            .live
            .iter()
            .enumerate()
            .map(|(i, range)| {
                WeightedIndex::new(range.combos().iter().map(|c| c.weight))
                    .map_err(|e| EngineError::range(format!("opponents[{}]", i), e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let batch_size = self.config.batch_size.max(1);
        let mut tally = Tally::default();
        let mut converged = false;
        let mut timed_out = false;

        while (tally.trials as usize) < budget {
            let mut remaining = budget - tally.trials as usize;
            let mut plan = Vec::with_capacity(BATCHES_PER_ROUND);
            while plan.len() < BATCHES_PER_ROUND && remaining > 0 {
                let size = remaining.min(batch_size);
                plan.push((self.rng.gen::<u64>(), size));
                remaining -= size;
            }

            let evaluator = self.evaluator;
            let samplers = &samplers;
            let partials = self.run(|| {
                plan.par_iter()
                    .map(|&(seed, size)| run_batch(setup, &evaluator, samplers, seed, size))
                    .collect::<Vec<_>>()
            });

            for partial in partials {
                tally.merge(&partial.ok_or_else(no_joint_assignment)?);
            }

            if let Some(threshold) = self.config.convergence_threshold {
                if tally.trials as usize >= self.config.min_iterations && tally.std_error() < threshold {
                    log::debug!(
                        "Converged after {} trials (std error {:.5})",
                        tally.trials,
                        tally.std_error()
                    );
                    converged = true;
                    break;
                }
            }

            if let Some(max_ms) = self.config.max_time_ms {
                if start.elapsed().as_millis() as u64 >= max_ms && (tally.trials as usize) < budget {
                    log::warn!(
                        "Equity sampling timed out after {} ms with {} of {} trials",
                        max_ms,
                        tally.trials,
                        budget
                    );
                    timed_out = true;
                    break;
                }
            }
        }

        log::debug!("Monte Carlo finished: {} trials, equity {:.4}", tally.trials, tally.equity());
        let elapsed = start.elapsed().as_millis() as u64;
        Ok(tally.into_result(EquityMethod::MonteCarlo, converged, timed_out, elapsed))
    }

    /// Run a parallel job on the dedicated pool, the global pool, or inline.
    fn run<T, F>(&self, job: F) -> T
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        match (&self.pool, self.config.num_threads) {
            (Some(pool), _) => pool.install(job),
            (None, Some(1)) => single_thread(job),
            (None, _) => job(),
        }
    }
}

impl<R: Rng> EquitySource for EquityCalculator<R> {
    fn estimate(&mut self, query: &EquityQuery) -> Result<EquityResult> {
        self.calculate(query)
    }
}

/// Pot odds: the equity needed to break even on a call.
///
/// Returns 0 when nothing is in the pot and nothing is to call.
pub fn pot_odds(pot: f64, to_call: f64) -> f64 {
    let total = pot + to_call;
    if total <= 0.0 {
        return 0.0;
    }
    to_call / total
}

/// Pot odds counting future bets won when the draw hits.
pub fn implied_pot_odds(pot: f64, to_call: f64, future_bets: f64, hit_probability: f64) -> f64 {
    let total = pot + future_bets * hit_probability + to_call;
    if total <= 0.0 {
        return 0.0;
    }
    to_call / total
}

/// Validated inputs shared by both strategies.
struct Setup {
    hero: HoleCards,
    board: Vec<Card>,
    /// Hero and board cards.
    dead: CardSet,
    /// Live opponent ranges, dead cards removed.
    live: Vec<WeightedRange>,
    /// Deck without hero and board cards.
    deck: Deck,
    to_come: usize,
}

impl Setup {
    fn new(query: &EquityQuery) -> Result<Self> {
        let hero_mask = query.hero.mask();
        let board_mask = query.board.mask();
        if hero_mask.len() != 2 {
            return Err(EngineError::hand("hero", "hole cards must be two distinct cards"));
        }
        if let Some(card) = query.hero.cards().into_iter().find(|&c| board_mask.contains(c)) {
            return Err(EngineError::hand("hero", format!("card {} also appears on the board", card)));
        }
        if query.opponents.is_empty() {
            return Err(EngineError::range("opponents", "at least one opponent is required"));
        }

        let dead = hero_mask.union(board_mask);
        let to_come = query.board.cards_to_come();
        let available = 52 - dead.len();
        if 2 * query.opponents.len() + to_come > available {
            return Err(EngineError::range(
                "opponents",
                format!("{} opponents do not fit in the {} remaining cards", query.opponents.len(), available),
            ));
        }

        let live = query
            .opponents
            .iter()
            .enumerate()
            .map(|(i, range)| range.live(&format!("opponents[{}]", i), dead))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            hero: query.hero,
            board: query.board.cards().to_vec(),
            dead,
            live,
            deck: Deck::without(dead),
            to_come,
        })
    }

    /// Upper bound on showdowns evaluated by exact enumeration.
    fn exact_evaluations(&self) -> f64 {
        let assignments: f64 = self.live.iter().map(|r| r.len() as f64).product();
        let cards_left = self.deck.remaining() - 2 * self.live.len();
        assignments * binomial(cards_left, self.to_come)
    }

    /// Hero's pot share on a complete board.
    #[inline]
    fn showdown(&self, evaluator: &HandEvaluator, opponents: &[HoleCards], runout: &[Card]) -> f64 {
        let mut cards = [Card::from_id(0); 7];
        let n_board = self.board.len();
        cards[2..2 + n_board].copy_from_slice(&self.board);
        cards[2 + n_board..7].copy_from_slice(runout);

        cards[0] = self.hero.card1;
        cards[1] = self.hero.card2;
        let hero_rank = evaluator.rank(&cards);

        let mut tied = 0usize;
        for opp in opponents {
            cards[0] = opp.card1;
            cards[1] = opp.card2;
            let rank = evaluator.rank(&cards);
            if rank > hero_rank {
                return 0.0;
            }
            if rank == hero_rank {
                tied += 1;
            }
        }
        1.0 / (tied as f64 + 1.0)
    }
}

fn no_joint_assignment() -> EngineError {
    EngineError::range("opponents", "no conflict-free assignment of opponent hands exists")
}

/// Assign opponents `index..` recursively, then enumerate runouts.
fn enumerate_opponents(
    setup: &Setup,
    evaluator: &HandEvaluator,
    index: usize,
    used: CardSet,
    weight: f64,
    assigned: &mut Vec<HoleCards>,
    tally: &mut Tally,
) {
    if index == setup.live.len() {
        let pool: Vec<Card> = setup
            .deck
            .remaining_cards()
            .iter()
            .copied()
            .filter(|&c| !used.contains(c))
            .collect();
        for_each_runout(&pool, setup.to_come, |runout| {
            tally.record(setup.showdown(evaluator, assigned, runout), weight);
        });
        return;
    }

    for entry in setup.live[index].combos() {
        let mask = entry.combo.mask();
        if mask.intersects(used) {
            continue;
        }
        assigned.push(entry.combo);
        enumerate_opponents(
            setup,
            evaluator,
            index + 1,
            used.union(mask),
            weight * entry.weight,
            assigned,
            tally,
        );
        assigned.pop();
    }
}

/// Call `f` with every `k`-card combination of `pool`.
fn for_each_runout<F: FnMut(&[Card])>(pool: &[Card], k: usize, mut f: F) {
    let n = pool.len();
    if k > n {
        return;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    let mut runout = vec![Card::from_id(0); k];
    loop {
        for (slot, &i) in runout.iter_mut().zip(&idx) {
            *slot = pool[i];
        }
        f(&runout);

        // Advance to the next combination in lexicographic order
        let mut i = k;
        loop {
            if i == 0 {
                return;
            }
            i -= 1;
            if idx[i] != i + n - k {
                break;
            }
            if i == 0 {
                return;
            }
        }
        idx[i] += 1;
        for j in (i + 1)..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// One Monte Carlo batch. `None` when opponents could not be assigned.
fn run_batch(
    setup: &Setup,
    evaluator: &HandEvaluator,
    samplers: &[WeightedIndex<f64>],
    seed: u64,
    size: usize,
) -> Option<Tally> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tally = Tally::default();
    let mut opponents = vec![HoleCards::new(Card::from_id(0), Card::from_id(1)); setup.live.len()];
    let mut runout = [Card::from_id(0); 5];
    let runout = &mut runout[..setup.to_come];

    for _ in 0..size {
        let used = sample_opponents(setup, samplers, &mut opponents, &mut rng)?;
        if !setup.deck.deal_into(used, runout, &mut rng) {
            return None;
        }
        tally.record(setup.showdown(evaluator, &opponents, runout), 1.0);
    }
    Some(tally)
}

/// Draw every opponent's hand jointly, restarting on any card collision.
fn sample_opponents<R: Rng>(
    setup: &Setup,
    samplers: &[WeightedIndex<f64>],
    out: &mut [HoleCards],
    rng: &mut R,
) -> Option<CardSet> {
    'attempt: for _ in 0..MAX_JOINT_ATTEMPTS {
        let mut used = CardSet::EMPTY;
        for (i, sampler) in samplers.iter().enumerate() {
            let combo = setup.live[i].combos()[sampler.sample(rng)].combo;
            let mask = combo.mask();
            if mask.intersects(used) {
                continue 'attempt;
            }
            used = used.union(mask);
            out[i] = combo;
        }
        return Some(used);
    }
    None
}

fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Run `job` on a fresh single-threaded pool so nested `par_iter`s stay sequential.
fn single_thread<T, F>(job: F) -> T
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(1).build() {
        Ok(pool) => pool.install(job),
        Err(e) => {
            log::warn!("Could not build single-thread pool ({}), running on the global pool", e);
            job()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hole(s: &str) -> HoleCards {
        HoleCards::parse(s).unwrap()
    }

    fn range(s: &str) -> WeightedRange {
        WeightedRange::parse("villain", s).unwrap()
    }

    fn fixed_budget() -> EquityConfig {
        EquityConfig::default()
            .with_convergence(None)
            .with_max_time_ms(None)
    }

    #[test]
    fn test_aa_vs_kk_preflop() {
        let mut calc = EquityCalculator::seeded(fixed_budget(), 42);
        let query = EquityQuery::new(hole("AsAh"), Board::new(), vec![range("KK")])
            .with_iterations(100_000);
        let result = calc.calculate(&query).unwrap();

        assert_eq!(result.method, EquityMethod::MonteCarlo);
        assert_eq!(result.iterations, 100_000);
        assert!((result.equity - 0.82).abs() < 0.01, "equity {}", result.equity);
        assert!((result.win + result.tie + result.loss - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_matches_monte_carlo() {
        let hero = hole("AhKh");
        let board = Board::parse("Qh Jd 2c 7s").unwrap();
        let query = EquityQuery::new(hero, board, vec![WeightedRange::random()]);

        let mut calc = EquityCalculator::seeded(fixed_budget(), 7);
        let exact = calc.calculate(&query).unwrap();
        assert_eq!(exact.method, EquityMethod::Exact);
        assert_eq!(exact.std_error, 0.0);
        assert!(exact.converged);

        let sampled = calc
            .calculate(
                &query
                    .clone()
                    .with_method(MethodPreference::MonteCarlo)
                    .with_iterations(200_000),
            )
            .unwrap();
        assert_eq!(sampled.method, EquityMethod::MonteCarlo);
        assert!(
            (exact.equity - sampled.equity).abs() < 0.005,
            "exact {} vs sampled {}",
            exact.equity,
            sampled.equity
        );
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let query = EquityQuery::new(hole("7c7d"), Board::new(), vec![range("AKs, QJs, 22+")])
            .with_iterations(20_000);

        let a = EquityCalculator::seeded(fixed_budget(), 99).calculate(&query).unwrap();
        let b = EquityCalculator::seeded(fixed_budget(), 99).calculate(&query).unwrap();
        assert_eq!(a.equity.to_bits(), b.equity.to_bits());
        assert_eq!(a.win.to_bits(), b.win.to_bits());
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let query = EquityQuery::new(hole("QsJs"), Board::new(), vec![range("random")])
            .with_iterations(16_000);

        let single = EquityCalculator::seeded(fixed_budget().with_threads(1), 3)
            .calculate(&query)
            .unwrap();
        let multi = EquityCalculator::seeded(fixed_budget().with_threads(4), 3)
            .calculate(&query)
            .unwrap();
        assert_eq!(single.equity.to_bits(), multi.equity.to_bits());
    }

    #[test]
    fn test_river_is_exact() {
        // Nut straight on the river against a pair of aces
        let board = Board::parse("Qd Jc Ts 4h 2s").unwrap();
        let mut calc = EquityCalculator::seeded(fixed_budget(), 1);
        let result = calc
            .calculate(&EquityQuery::new(hole("AsKh"), board, vec![range("AA")]))
            .unwrap();
        assert_eq!(result.method, EquityMethod::Exact);
        assert_eq!(result.equity, 1.0);
        assert_eq!(result.loss, 0.0);
    }

    #[test]
    fn test_split_pot() {
        // Board plays for everyone: royal flush on board
        let board = Board::parse("As Ks Qs Js Ts").unwrap();
        let mut calc = EquityCalculator::seeded(fixed_budget(), 1);
        let one = calc
            .calculate(&EquityQuery::new(hole("2c3d"), board.clone(), vec![range("44")]))
            .unwrap();
        assert!((one.equity - 0.5).abs() < 1e-12);
        assert!((one.tie - 1.0).abs() < 1e-12);

        let two = calc
            .calculate(&EquityQuery::new(hole("2c3d"), board, vec![range("44"), range("55")]))
            .unwrap();
        assert!((two.equity - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_multiway_exact_and_sampled() {
        let board = Board::parse("Kd 8c 3s 2h").unwrap();
        let query = EquityQuery::new(hole("AcAd"), board, vec![range("KK, 88"), range("33, 22, AK")]);

        let mut calc = EquityCalculator::seeded(fixed_budget(), 11);
        let exact = calc.calculate(&query).unwrap();
        assert_eq!(exact.method, EquityMethod::Exact);

        let sampled = calc
            .calculate(&query.clone().with_method(MethodPreference::MonteCarlo).with_iterations(100_000))
            .unwrap();
        assert!((exact.equity - sampled.equity).abs() < 0.01);
    }

    #[test]
    fn test_forced_exact_falls_back_when_too_large() {
        let config = fixed_budget().with_max_exact(1_000);
        let mut calc = EquityCalculator::seeded(config, 5);
        let query = EquityQuery::new(hole("AsAh"), Board::new(), vec![range("KK")])
            .with_method(MethodPreference::Exact)
            .with_iterations(2_000);
        let result = calc.calculate(&query).unwrap();
        assert_eq!(result.method, EquityMethod::MonteCarlo);
        assert_eq!(result.iterations, 2_000);
    }

    #[test]
    fn test_convergence_stops_early() {
        let config = EquityConfig::default()
            .with_convergence(Some(0.01))
            .with_max_time_ms(None)
            .with_batch_size(500);
        let mut calc = EquityCalculator::seeded(config, 8);
        let query = EquityQuery::new(hole("AsAh"), Board::new(), vec![range("random")])
            .with_iterations(1_000_000);
        let result = calc.calculate(&query).unwrap();
        assert!(result.converged);
        assert!(result.iterations < 1_000_000);
        assert!(result.std_error < 0.01);
    }

    #[test]
    fn test_time_budget_flags_timeout() {
        let config = EquityConfig::default()
            .with_convergence(None)
            .with_max_time_ms(Some(0))
            .with_batch_size(100);
        let mut calc = EquityCalculator::seeded(config, 8);
        let query = EquityQuery::new(hole("AsAh"), Board::new(), vec![range("random")])
            .with_iterations(10_000_000);
        let result = calc.calculate(&query).unwrap();
        assert!(result.timed_out);
        assert!(!result.converged);
        assert!(result.iterations > 0 && result.iterations < 10_000_000);
    }

    #[test]
    fn test_empty_live_range_is_invalid() {
        let board = Board::parse("Ah Ad 7c").unwrap();
        let mut calc = EquityCalculator::seeded(fixed_budget(), 1);
        let err = calc
            .calculate(&EquityQuery::new(hole("AsAc"), board, vec![range("AA")]))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange { ref field, .. } if field == "opponents[0]"));
    }

    #[test]
    fn test_conflicting_opponents_are_invalid() {
        let mut calc = EquityCalculator::seeded(fixed_budget(), 1);
        let query = EquityQuery::new(hole("2c2d"), Board::new(), vec![range("AsKs"), range("AsQs")])
            .with_method(MethodPreference::MonteCarlo)
            .with_iterations(10);
        assert!(matches!(calc.calculate(&query), Err(EngineError::InvalidRange { .. })));

        let query = query.with_method(MethodPreference::Auto);
        assert!(matches!(calc.calculate(&query), Err(EngineError::InvalidRange { .. })));
    }

    #[test]
    fn test_hero_board_overlap_rejected() {
        let board = Board::parse("As 7d 2c").unwrap();
        let mut calc = EquityCalculator::seeded(fixed_budget(), 1);
        let err = calc
            .calculate(&EquityQuery::new(hole("AsKh"), board, vec![range("random")]))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidHand { field: "hero", .. }));
    }

    #[test]
    fn test_runout_enumeration_counts() {
        let pool: Vec<Card> = (0..10).map(Card::from_id).collect();
        let mut count = 0;
        for_each_runout(&pool, 3, |_| count += 1);
        assert_eq!(count, 120);

        let mut count = 0;
        for_each_runout(&pool, 0, |r| {
            assert!(r.is_empty());
            count += 1
        });
        assert_eq!(count, 1);
    }

    #[test]
    fn test_pot_odds_helpers() {
        assert!((pot_odds(100.0, 50.0) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(pot_odds(0.0, 0.0), 0.0);
        assert_eq!(pot_odds(100.0, 0.0), 0.0);

        let implied = implied_pot_odds(100.0, 50.0, 200.0, 0.5);
        assert!((implied - 0.2).abs() < 1e-12);
        assert!(implied < pot_odds(100.0, 50.0));
        assert_eq!(implied_pot_odds(100.0, 50.0, 0.0, 0.5), pot_odds(100.0, 50.0));
    }
}
