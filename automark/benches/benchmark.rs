use automark::automaton::Automaton;
use automark::grade::{grade, Config};
use automark::nfa::Nfa;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// The binary-residue DFA: state i means "value read so far is i mod `modulus`", accepting 0
fn residue_automaton(modulus: usize) -> Automaton {
    let names: Vec<String> = (0..modulus).map(|i| format!("r{i}")).collect();
    let states: Vec<&str> = names.iter().map(String::as_str).collect();
    let triples: Vec<(&str, &str, &str)> = (0..modulus)
        .flat_map(|i| {
            [
                (names[i].as_str(), "0", names[(2 * i) % modulus].as_str()),
                (names[i].as_str(), "1", names[(2 * i + 1) % modulus].as_str()),
            ]
        })
        .collect();
    Automaton::new(&states, &["0", "1"], &triples, names[0].as_str(), &[names[0].as_str()])
}

/// The classic NFA for "the n-th symbol from the end is an a"; its subset construction has 2^n
/// states
fn nth_from_end(n: usize) -> Automaton {
    let names: Vec<String> = (0..=n).map(|i| format!("q{i}")).collect();
    let states: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut triples: Vec<(&str, &str, &str)> = vec![
        (names[0].as_str(), "a", names[0].as_str()),
        (names[0].as_str(), "b", names[0].as_str()),
        (names[0].as_str(), "a", names[1].as_str()),
    ];
    for i in 1..n {
        triples.push((names[i].as_str(), "a", names[i + 1].as_str()));
        triples.push((names[i].as_str(), "b", names[i + 1].as_str()));
    }
    Automaton::new(
        &states,
        &["a", "b"],
        &triples,
        names[0].as_str(),
        &[names[n].as_str()],
    )
}

pub fn determinization(c: &mut Criterion) {
    let automaton = nth_from_end(10);
    let nfa = Nfa::try_from(&automaton).unwrap();
    c.bench_function("subset construction", |b| {
        b.iter(|| black_box(&nfa).to_dfa())
    });
}

pub fn minimization(c: &mut Criterion) {
    let automaton = residue_automaton(64);
    let dfa = Nfa::try_from(&automaton)
        .unwrap()
        .as_deterministic()
        .unwrap();
    c.bench_function("hopcroft minimization", |b| {
        b.iter(|| black_box(&dfa).minimized())
    });
}

pub fn grading(c: &mut Criterion) {
    let student = nth_from_end(8);
    let reference = nth_from_end(8);
    let config = Config::default();
    c.bench_function("full grading call", |b| {
        b.iter(|| grade(black_box(&student), black_box(&reference), &config))
    });
}

criterion_group!(benches, determinization, minimization, grading);
criterion_main!(benches);
