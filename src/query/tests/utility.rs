use crate::query::Queryable;
use once_cell::sync::Lazy;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

/// An employee row for join and grouping scenarios.
#[derive(Clone, Debug, PartialEq)]
pub struct Employee {
    pub id: i32,
    pub name: &'static str,
    pub department: &'static str,
    pub salary: i32,
}

/// A department row. "hr" is intentionally missing so outer joins have
/// an unmatched left side, and "support" has no employees so they have
/// an unmatched right side.
#[derive(Clone, Debug, PartialEq)]
pub struct Department {
    pub name: &'static str,
    pub floor: i32,
}

pub static EMPLOYEES: Lazy<Vec<Employee>> = Lazy::new(|| {
    vec![
        Employee { id: 1, name: "Ava", department: "eng", salary: 120 },
        Employee { id: 2, name: "Ben", department: "eng", salary: 95 },
        Employee { id: 3, name: "Cleo", department: "sales", salary: 80 },
        Employee { id: 4, name: "Dan", department: "hr", salary: 70 },
    ]
});

pub static DEPARTMENTS: Lazy<Vec<Department>> = Lazy::new(|| {
    vec![
        Department { name: "eng", floor: 3 },
        Department { name: "sales", floor: 1 },
        Department { name: "support", floor: 2 },
    ]
});

pub fn employees() -> Queryable<Employee> {
    Queryable::from_vec(EMPLOYEES.clone())
}

pub fn departments() -> Queryable<Department> {
    Queryable::from_vec(DEPARTMENTS.clone())
}

/// Generates `n` pseudo-random integers in `0..100` from a fixed seed,
/// so tests stay deterministic across runs.
pub fn random_numbers(n: usize, seed: u64) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..100)).collect()
}
