//! Rules applied when propagation stalls.
//!
//! Two kinds of cycle leave orders undecided once the worklist drains:
//! circular movement, where every unit in a ring moves into the province the
//! next one leaves, and convoy paradoxes, where a convoyed army's attack
//! decides the fate of its own convoy.

use super::adjudicator::Adjudicator;
use super::state::OrderId;
use super::strength;
use super::tristate::Tristate;

/// The undecided move `id` waits on, if it waits on the move of the unit in
/// its destination and is not a head-to-head battle.
fn waits_on(adj: &Adjudicator, id: OrderId) -> Option<OrderId> {
    let status = adj.status(id);
    if status.eval != Tristate::Uncertain || !adj.order(id).is_move() || strength::head_to_head(adj, id, status.convoying).is_some() {
        return None;
    }
    let occupant = adj.deps(id).occupant?;
    (adj.order(occupant).is_move() && adj.status(occupant).eval == Tristate::Uncertain).then_some(occupant)
}

/// Moves forming rings in which every member moves.
///
/// A ring qualifies when each member's route is certain and each beats
/// every other contender for its destination once that destination empties.
pub fn circular_movement(adj: &Adjudicator) -> Vec<OrderId> {
    const NEW: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut mark = vec![NEW; adj.len()];
    let mut moving = Vec::new();
    for (start, _) in adj.orders() {
        let mut path = Vec::new();
        let mut cur = Some(start);
        while let Some(id) = cur {
            match mark[id.index()] {
                DONE => break,
                ON_PATH => {
                    let Some(pos) = path.iter().position(|p| *p == id) else { break };
                    let ring = &path[pos..];
                    let all_move = ring.iter().all(|m: &OrderId| {
                        let status = adj.status(*m);
                        status.path == Tristate::Success && status.beats_contenders
                    });
                    if all_move {
                        moving.extend_from_slice(ring);
                    }
                    break;
                }
                _ => {
                    mark[id.index()] = ON_PATH;
                    path.push(id);
                    cur = waits_on(adj, id);
                }
            }
        }
        for id in path {
            mark[id.index()] = DONE;
        }
    }
    moving.sort_unstable();
    moving
}

/// Tarjan's strongly connected components over the undecided orders,
/// following each order's read set.
struct Components<'a, 'w> {
    adj: &'a Adjudicator<'w>,
    index: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<OrderId>,
    next: usize,
    found: Vec<Vec<OrderId>>,
}

impl<'a, 'w> Components<'a, 'w> {
    fn new(adj: &'a Adjudicator<'w>) -> Self {
        let n = adj.len();
        Components {
            adj,
            index: vec![None; n],
            low: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            next: 0,
            found: Vec::new(),
        }
    }

    fn undecided_reads(&self, id: OrderId) -> impl Iterator<Item = OrderId> + 'a {
        let adj = self.adj;
        adj.deps(id).reads.iter().copied().filter(move |r| !adj.status(*r).is_settled())
    }

    fn visit(&mut self, v: OrderId) {
        let i = v.index();
        self.index[i] = Some(self.next);
        self.low[i] = self.next;
        self.next += 1;
        self.stack.push(v);
        self.on_stack[i] = true;

        let reads: Vec<OrderId> = self.undecided_reads(v).collect();
        for w in reads {
            match self.index[w.index()] {
                None => {
                    self.visit(w);
                    self.low[i] = self.low[i].min(self.low[w.index()]);
                }
                Some(wi) if self.on_stack[w.index()] => self.low[i] = self.low[i].min(wi),
                Some(_) => {}
            }
        }

        if Some(self.low[i]) == self.index[i] {
            let mut component = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w.index()] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            self.found.push(component);
        }
    }

    fn run(mut self) -> Vec<Vec<OrderId>> {
        for (id, _) in self.adj.orders() {
            if self.index[id.index()].is_none() && !self.adj.status(id).is_settled() {
                self.visit(id);
            }
        }
        self.found
    }
}

/// Convoyed moves the Szykman rule fails: the undecided convoyed moves of
/// the cyclic components nothing else undecided is read from.
pub fn szykman(adj: &Adjudicator) -> Vec<OrderId> {
    let components = Components::new(adj).run();
    let mut component_of = vec![usize::MAX; adj.len()];
    for (c, members) in components.iter().enumerate() {
        for m in members {
            component_of[m.index()] = c;
        }
    }

    let cyclic = |members: &[OrderId]| {
        members.len() > 1 || members.iter().any(|m| adj.deps(*m).reads.contains(m))
    };
    let is_sink = |c: usize| {
        components[c].iter().all(|m| {
            adj.deps(*m)
                .reads
                .iter()
                .all(|r| adj.status(*r).is_settled() || component_of[r.index()] == c)
        })
    };
    let convoyed = |members: &[OrderId]| -> Vec<OrderId> {
        members
            .iter()
            .copied()
            .filter(|m| {
                let status = adj.status(*m);
                adj.order(*m).is_move() && status.convoying && status.path != Tristate::Failure
            })
            .collect()
    };

    let mut result: Vec<OrderId> = (0..components.len())
        .filter(|c| cyclic(&components[*c]) && is_sink(*c))
        .flat_map(|c| convoyed(&components[c]))
        .collect();
    if result.is_empty() {
        result = components.iter().filter(|c| cyclic(c)).flat_map(|c| convoyed(c)).collect();
    }
    result.sort_unstable();
    result
}
