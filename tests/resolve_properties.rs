//! Properties every compile order must satisfy

use dssat_prep::resolve::ResolveState;
use dssat_prep::{resolve, scan_text, ModuleName, ResolveError, Resolver, SourceUnit};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use yare::parameterized;

fn unit(path: &str, text: &str) -> SourceUnit {
    SourceUnit::new(PathBuf::from(path), scan_text(text))
}

/// Every required module is provided by an earlier unit or the unit itself.
fn assert_valid_order(order: &[SourceUnit]) {
    let mut available: BTreeSet<ModuleName> = BTreeSet::new();
    for unit in order {
        for needed in unit.requires() {
            assert!(
                available.contains(needed) || unit.provides().contains(needed),
                "{} uses {} before it is compiled",
                unit.path().display(),
                needed
            );
        }
        available.extend(unit.provides().iter().cloned());
    }
}

fn assert_permutation(input: &[SourceUnit], output: &[SourceUnit]) {
    assert_eq!(input.len(), output.len());
    let mut counts: HashMap<&std::path::Path, i32> = HashMap::new();
    for unit in input {
        *counts.entry(unit.path()).or_default() += 1;
    }
    for unit in output {
        *counts.entry(unit.path()).or_default() -= 1;
    }
    assert!(counts.values().all(|&c| c == 0));
}

fn model() -> Vec<SourceUnit> {
    vec![
        unit("CSM.for", "      PROGRAM CSM\n      USE ModuleDefs\n      USE Weather\n      END"),
        unit("Weather.for", "      MODULE Weather\n      USE ModuleDefs\n      USE Utils\n      END MODULE"),
        unit("Plant.for", "      SUBROUTINE PLANT\n      USE ModuleDefs\n      END"),
        unit("Utils.f90", "module utils\nuse moduledefs\nend module utils"),
        unit("ModuleDefs.for", "      MODULE ModuleDefs\n      END MODULE ModuleDefs"),
        unit("Data.for", "      BLOCK DATA\n      END"),
    ]
}

#[test]
fn test_order_is_valid_permutation() {
    let units = model();
    let order = resolve(&units).unwrap();

    assert_valid_order(&order.units);
    assert_permutation(&units, &order.units);
}

#[test]
#[should_panic(expected = "c.for uses a before it is compiled")]
fn test_order_check_rejects_use_before_provide() {
    let order = vec![
        unit("b.for", "MODULE B\nEND"),
        unit("c.for", "USE A\nUSE B\nEND"),
        unit("a.for", "MODULE A\nEND"),
    ];
    assert_valid_order(&order);
}

#[test]
fn test_order_is_deterministic() {
    let units = model();
    let first = resolve(&units).unwrap();
    let second = resolve(&units).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_worked_example() {
    let units = vec![
        unit("C.for", "USE A\nUSE B\nEND"),
        unit("A.for", "MODULE A\nEND"),
        unit("B.for", "MODULE B\nUSE A\nEND"),
    ];

    let order = resolve(&units).unwrap();
    let paths: Vec<&str> = order.paths().filter_map(|p| p.to_str()).collect();
    assert_eq!(paths, vec!["A.for", "B.for", "C.for"]);
    assert_eq!(order.passes, 2);
}

#[test]
fn test_no_dependencies_keeps_input_order() {
    let units = vec![
        unit("z.for", "END"),
        unit("m.for", "MODULE M\nEND"),
        unit("a.for", "END"),
    ];
    let order = resolve(&units).unwrap();
    let paths: Vec<&str> = order.paths().filter_map(|p| p.to_str()).collect();
    assert_eq!(paths, vec!["z.for", "m.for", "a.for"]);
    assert_eq!(order.passes, 1);
}

#[test]
fn test_self_provided_requirement() {
    let units = vec![unit("self.f90", "module m\nuse m\nend module")];
    assert!(resolve(&units).is_ok());
}

#[parameterized(
    two_cycle = { &[("a.for", "MODULE A\nUSE B\nEND"), ("b.for", "MODULE B\nUSE A\nEND")], 2 },
    dangling = { &[("a.for", "MODULE A\nEND"), ("b.for", "USE MISSING\nEND")], 1 },
    chain_to_dangling = { &[("a.for", "MODULE A\nUSE GONE\nEND"), ("b.for", "USE A\nEND")], 2 },
)]
fn test_unresolvable(sources: &[(&str, &str)], stuck_count: usize) {
    let units: Vec<SourceUnit> = sources.iter().map(|(p, t)| unit(p, t)).collect();

    match resolve(&units) {
        Err(ResolveError::Unresolvable { stuck, .. }) => assert_eq!(stuck.len(), stuck_count),
        other => panic!("Expected Unresolvable, got {:?}", other),
    }
}

#[test]
fn test_unresolvable_names_undeclared_modules() {
    let units = vec![unit("a.for", "USE netcdf\nEND"), unit("b.for", "MODULE B\nUSE A\nEND")];

    let err = resolve(&units).unwrap_err();
    let ResolveError::Unresolvable { undeclared, .. } = &err;
    let names: Vec<&str> = undeclared.iter().map(ModuleName::as_str).collect();
    assert_eq!(names, vec!["a", "netcdf"]);
    assert!(err.to_string().contains("netcdf"));
}

#[test]
fn test_external_modules_satisfy_requirements() {
    let units = vec![unit("a.f90", "program a\nuse iso_c_binding\nend program")];
    assert!(resolve(&units).is_err());

    let resolver = Resolver::new().with_external_modules(ModuleName::new("ISO_C_BINDING"));
    let order = resolver.resolve(&units).unwrap();
    assert_eq!(order.len(), 1);
}

#[test]
fn test_step_snapshots_are_independent() {
    let units = model();
    let start = ResolveState::new(units.len());

    let first = start.step(&units);
    assert!(first.newly_ordered > 0);
    assert_eq!(start.order().len(), 0);
    assert_eq!(start.passes(), 0);

    let again = start.step(&units);
    assert_eq!(first.state, again.state);
}
