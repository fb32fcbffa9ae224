//! Route evaluator that computes timing, load, and feasibility.

use crate::distance::ArcCost;
use crate::models::{Route, RoutingProblem, Solution, Violation, ViolationType, Visit};

/// Sum of arc costs along `depot → stops… → depot`.
///
/// An empty sequence costs nothing.
pub fn route_cost<C: ArcCost + ?Sized>(cost: &C, stops: &[usize]) -> f64 {
    let Some((&first, _)) = stops.split_first() else {
        return 0.0;
    };
    let mut total = cost.arc_cost(0, first);
    for pair in stops.windows(2) {
        total += cost.arc_cost(pair[0], pair[1]);
    }
    total + cost.arc_cost(stops[stops.len() - 1], 0)
}

/// Result of one forward pass over a stop sequence.
#[derive(Debug, Clone, Copy)]
struct Pass {
    load: i32,
    start: f64,
    end: f64,
    /// Arrivals after a window closed.
    late_stops: usize,
    /// Largest departure delay that keeps every arrival on time.
    forward_slack: f64,
    total_wait: f64,
}

impl Pass {
    /// Departure delay that absorbs waiting without making any stop late.
    fn shift(&self) -> f64 {
        self.forward_slack.min(self.total_wait).max(0.0)
    }

    fn duration(&self) -> f64 {
        self.end - self.start - self.shift()
    }
}

/// Evaluates routes against the capacity and time dimensions of a problem.
///
/// Vehicles leave the depot when it opens, wait at stops reached before their
/// window opens, and must reach every stop and the depot before the window
/// closes. The route duration is measured after delaying the departure as
/// far as the forward slack allows, which removes waiting that a later start
/// would avoid.
///
/// With the time dimension disabled (see
/// [`with_time_windows`](Self::with_time_windows)) the schedule is still
/// computed and reported, but only capacity decides feasibility.
///
/// # Examples
///
/// ```
/// use lpg_routing::distance::DistanceMatrix;
/// use lpg_routing::evaluation::RouteEvaluator;
/// use lpg_routing::models::{Fleet, Location, RoutingProblem, TimeWindow};
///
/// let day = TimeWindow::new(0.0, 600.0).unwrap();
/// let locations = vec![
///     Location::depot(32.77, -96.79, day),
///     Location::new(1, 32.80, -96.75, 10, day),
///     Location::new(2, 32.70, -96.85, 20, day),
/// ];
/// let m = DistanceMatrix::from_rows(&[
///     vec![0.0, 5.0, 5.0],
///     vec![5.0, 0.0, 5.0],
///     vec![5.0, 5.0, 0.0],
/// ]).unwrap();
/// let fleet = Fleet::homogeneous(1, 100, 480.0).unwrap();
/// let problem = RoutingProblem::new(locations, fleet, m.clone(), m).unwrap();
///
/// let evaluator = RouteEvaluator::new(&problem);
/// let (route, violations) = evaluator.build_route(0, &[1, 2]);
/// assert_eq!(route.len(), 2);
/// assert_eq!(route.total_distance(), 15.0);
/// assert!(violations.is_empty());
/// ```
pub struct RouteEvaluator<'a> {
    problem: &'a RoutingProblem,
    time_windows: bool,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator for the given problem.
    pub fn new(problem: &'a RoutingProblem) -> Self {
        Self {
            problem,
            time_windows: true,
        }
    }

    /// Enables or disables checks on stop windows, depot hours, and the
    /// maximum route duration.
    pub fn with_time_windows(mut self, enabled: bool) -> Self {
        self.time_windows = enabled;
        self
    }

    pub fn enforces_time_windows(&self) -> bool {
        self.time_windows
    }

    pub fn problem(&self) -> &'a RoutingProblem {
        self.problem
    }

    /// Returns `true` if the sequence satisfies capacity, every time window,
    /// the depot closing time, and the maximum route duration.
    ///
    /// Does not allocate.
    pub fn is_feasible<I>(&self, stops: I) -> bool
    where
        I: IntoIterator<Item = usize>,
    {
        let pass = self.forward_pass(stops, |_| {});
        if pass.load > self.problem.capacity() {
            return false;
        }
        if !self.time_windows {
            return true;
        }
        pass.late_stops == 0
            && pass.end <= self.problem.depot().time_window().due()
            && pass.duration() <= self.problem.max_route_duration()
    }

    /// Builds a route for `vehicle_id` from a sequence of location indices,
    /// computing the schedule, load, and distance.
    ///
    /// Returns the route and any constraint violations found.
    pub fn build_route(&self, vehicle_id: usize, stops: &[usize]) -> (Route, Vec<Violation>) {
        let problem = self.problem;
        let time_windows = self.time_windows;
        let mut violations = Vec::new();

        let pass = self.forward_pass(stops.iter().copied(), |visit| {
            let due = problem.location(visit.location).time_window().due();
            if time_windows && visit.arrival_time > due {
                violations.push(Violation::new(ViolationType::TimeWindowViolated {
                    location: visit.location,
                    arrival: visit.arrival_time,
                    due,
                }));
            }
        });

        // Replay from the delayed departure so the stored schedule is the
        // one whose duration is reported.
        let shift = pass.shift();
        let mut route = Route::new(vehicle_id);
        self.schedule(stops.iter().copied(), pass.start + shift, |visit| {
            route.push_visit(visit)
        });
        route.set_total_distance(route_cost(problem.distances(), stops));
        route.set_times(pass.start + shift, pass.end);

        if pass.load > problem.capacity() {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                vehicle_id,
                load: pass.load,
                capacity: problem.capacity(),
            }));
        }
        if !time_windows {
            return (route, violations);
        }
        let depot_due = problem.depot().time_window().due();
        if pass.end > depot_due {
            violations.push(Violation::new(ViolationType::DepotWindowViolated {
                vehicle_id,
                arrival: pass.end,
                due: depot_due,
            }));
        }
        if pass.duration() > problem.max_route_duration() {
            violations.push(Violation::new(ViolationType::MaxDurationExceeded {
                vehicle_id,
                duration: pass.duration(),
                max_duration: problem.max_route_duration(),
            }));
        }

        (route, violations)
    }

    /// Builds a solution from per-vehicle stop sequences: `sequences[k]` is
    /// driven by vehicle `k`. Empty sequences produce no route.
    pub fn build_solution(&self, sequences: &[Vec<usize>], unassigned: Vec<usize>) -> Solution {
        let routes = sequences
            .iter()
            .enumerate()
            .filter(|(_, stops)| !stops.is_empty())
            .map(|(vehicle_id, stops)| self.build_route(vehicle_id, stops).0)
            .collect();
        Solution::new(routes, unassigned)
    }

    /// Evaluates an entire solution, returning its distance and every
    /// violation across its routes.
    pub fn evaluate_solution(&self, solution: &Solution) -> (f64, Vec<Violation>) {
        let mut total_cost = 0.0;
        let mut all_violations = Vec::new();

        for route in solution.routes() {
            let (rebuilt, mut violations) = self.build_route(route.vehicle_id(), &route.stops());
            total_cost += rebuilt.total_distance();
            all_violations.append(&mut violations);
        }

        (total_cost, all_violations)
    }

    /// Returns `true` if every route of `solution` is feasible.
    pub fn is_solution_feasible(&self, solution: &Solution) -> bool {
        solution
            .routes()
            .iter()
            .all(|route| self.is_feasible(route.visits().iter().map(|v| v.location)))
    }

    fn forward_pass<I, F>(&self, stops: I, on_visit: F) -> Pass
    where
        I: IntoIterator<Item = usize>,
        F: FnMut(Visit),
    {
        let depot = self.problem.depot().time_window();
        let start = depot.ready();
        let mut late_stops = 0;
        let mut forward_slack = f64::INFINITY;
        let mut total_wait = 0.0;
        let mut on_visit = on_visit;

        let (load, last, departure) = self.schedule(stops, start, |visit| {
            let due = self.problem.location(visit.location).time_window().due();
            if visit.arrival_time > due {
                late_stops += 1;
            }
            forward_slack = forward_slack.min(total_wait + due - visit.arrival_time);
            total_wait += visit.waiting_time();
            on_visit(visit);
        });

        let end = departure + self.problem.travel_time(last, 0);
        forward_slack = forward_slack.min(total_wait + depot.due() - end);

        Pass {
            load,
            start,
            end,
            late_stops,
            forward_slack,
            total_wait,
        }
    }

    /// Walks the sequence from `start`, reporting each visit. Returns the
    /// final load, the last location, and the departure from it.
    fn schedule<I, F>(&self, stops: I, start: f64, mut on_visit: F) -> (i32, usize, f64)
    where
        I: IntoIterator<Item = usize>,
        F: FnMut(Visit),
    {
        let problem = self.problem;
        let mut load = 0;
        let mut prev = 0;
        let mut departure = start;

        for location in stops {
            let arrival = departure + problem.travel_time(prev, location);
            let stop = problem.location(location);
            let service_start = arrival + stop.time_window().waiting_time(arrival);
            let service = if problem.service_times_enabled() {
                stop.service_minutes()
            } else {
                0.0
            };
            load += stop.demand();
            departure = service_start + service;

            on_visit(Visit {
                location,
                arrival_time: arrival,
                service_start,
                departure_time: departure,
                load_after: load,
            });
            prev = location;
        }

        (load, prev, departure)
    }
}
