//! Unit tests for the derived metadata of nchelpers
//!
//! These tests run against `MemoryDataset` so that each metadata rule can be
//! exercised without writing NetCDF files.

use nchelpers::{
    axis_for_dim_name, median_step, Axis, CfDataset, CfSource, Concept, MemoryDataset,
    NcHelpersError, ProjectFamily, Resolution, DIM_NAME_AXES,
};
use ndarray::{aview1, s, Array1};
use std::collections::BTreeMap;

const DAY: f64 = 86_400.0;

/// Start of each month of 1950 in a 365_day calendar, in days since 1950-01-01
const MONTH_STARTS: [f64; 12] = [
    0.0, 31.0, 59.0, 90.0, 120.0, 151.0, 181.0, 212.0, 243.0, 273.0, 304.0, 334.0,
];

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// lon/lat/time grid with a time variable in the given units and calendar
fn gridded(time_values: Vec<f64>, units: &str, calendar: &str) -> MemoryDataset {
    MemoryDataset::new()
        .with_dimension("lon")
        .with_dimension("lat")
        .with_dimension("time")
        .with_dimension("bnds")
        .with_variable("lon", &["lon"], vec![0.0, 1.0])
        .with_variable("lat", &["lat"], vec![0.0, 1.0])
        .with_variable("time", &["time"], time_values)
        .with_variable_attribute("time", "units", units)
        .with_variable_attribute("time", "calendar", calendar)
        .with_variable("time_bnds", &["time", "bnds"], vec![])
        .with_variable("tasmax", &["time", "lat", "lon"], vec![])
}

fn cmip5(ds: MemoryDataset) -> MemoryDataset {
    ds.with_global_attribute("project_id", "CMIP5")
        .with_global_attribute("institute_id", "CCCma")
        .with_global_attribute("model_id", "CanESM2")
        .with_global_attribute("experiment_id", "rcp85")
        .with_global_attribute("parent_experiment_rip", "r1i1p1")
}

fn monthly_cmip5() -> CfDataset<MemoryDataset> {
    CfDataset::new(cmip5(gridded(
        MONTH_STARTS.to_vec(),
        "days since 1950-01-01",
        "365_day",
    )))
}

#[test]
fn test_error_types() {
    let var_err = NcHelpersError::VariableNotFound {
        var: "temp".to_string(),
    };
    assert!(format!("{}", var_err).contains("Variable 'temp' not found"));

    let attr_err = NcHelpersError::MissingAttribute {
        var: "time".to_string(),
        attr: "calendar".to_string(),
    };
    assert_eq!(format!("{}", attr_err), "Variable 'time' has no 'calendar' attribute");

    let meta_err = NcHelpersError::UnresolvedMetadata {
        concept: "model".to_string(),
    };
    assert!(format!("{}", meta_err).contains("'model' is not resolvable"));
}

#[test]
fn test_axes_from_names_table() {
    let expected = [
        ("lat", Axis::Y),
        ("latitude", Axis::Y),
        ("lon", Axis::X),
        ("longitude", Axis::X),
        ("xc", Axis::X),
        ("yc", Axis::Y),
        ("x", Axis::X),
        ("y", Axis::Y),
        ("time", Axis::T),
        ("timeofyear", Axis::T),
        ("plev", Axis::Z),
        ("lev", Axis::Z),
        ("level", Axis::Z),
    ];
    assert_eq!(DIM_NAME_AXES.len(), expected.len());

    let ds = CfDataset::new(MemoryDataset::new());
    for (name, axis) in expected {
        assert_eq!(axis_for_dim_name(name), Some(axis), "dimension {name}");
        let guess = ds.axes_from_names(Some(&names(&[name])));
        assert_eq!(guess.get(&axis), Some(&name.to_string()));
    }

    // Unrecognized names are dropped, never an error
    let guess = ds.axes_from_names(Some(&names(&["lat", "station", "LAT", "bnds"])));
    assert_eq!(guess.len(), 1);
    assert_eq!(guess[&Axis::Y], "lat");
}

#[test]
fn test_axes_from_names_defaults_to_all_dimensions() {
    let guess = monthly_cmip5().axes_from_names(None);
    assert_eq!(guess[&Axis::X], "lon");
    assert_eq!(guess[&Axis::Y], "lat");
    assert_eq!(guess[&Axis::T], "time");
    assert!(!guess.contains_key(&Axis::Z));
}

#[test]
fn test_axes_collision_last_dimension_wins() {
    let ds = CfDataset::new(MemoryDataset::new());
    let guess = ds.axes_from_names(Some(&names(&["lon", "xc"])));
    assert_eq!(guess[&Axis::X], "xc");

    let axes = ds.axes(Some(&names(&["lon", "xc"])));
    assert_eq!(axes.len(), 1);
    assert_eq!(axes["xc"], Axis::X);
}

#[test]
fn test_axes_attribute_overrides_name() {
    let source = MemoryDataset::new()
        .with_dimension("lat")
        .with_dimension("lon")
        .with_variable("lat", &["lat"], vec![])
        .with_variable_attribute("lat", "axis", "Z")
        .with_variable("lon", &["lon"], vec![])
        .with_variable_attribute("lon", "axis", "X");
    let ds = CfDataset::new(source);

    let axes = ds.axes(None);
    let expected: BTreeMap<String, Axis> =
        [("lat".to_string(), Axis::Z), ("lon".to_string(), Axis::X)].into();
    assert_eq!(axes, expected);
}

#[test]
fn test_axes_compress_forces_space_axis() {
    let source = MemoryDataset::new()
        .with_dimension("lat")
        .with_variable("lat", &["lat"], vec![])
        .with_variable_attribute("lat", "axis", "Z")
        .with_variable_attribute("lat", "compress", "lat lon");
    let ds = CfDataset::new(source);

    assert_eq!(ds.axes(None)["lat"], Axis::S);
}

#[test]
fn test_axes_ignores_unrecognized_axis_attribute() {
    let source = MemoryDataset::new()
        .with_dimension("lev")
        .with_variable("lev", &["lev"], vec![])
        .with_variable_attribute("lev", "axis", "vertical");
    let ds = CfDataset::new(source);

    assert_eq!(ds.axes(None)["lev"], Axis::Z);
}

#[test]
fn test_axes_empty_input() {
    let ds = monthly_cmip5();
    assert!(ds.axes(Some(&[])).is_empty());
    assert_eq!(ds.axes(None).len(), 3);
}

#[test]
fn test_dimension_names() {
    let ds = monthly_cmip5();
    assert_eq!(
        ds.dimension_names(None).unwrap(),
        names(&["lon", "lat", "time", "bnds"])
    );
    assert_eq!(
        ds.dimension_names(Some("tasmax")).unwrap(),
        names(&["time", "lat", "lon"])
    );

    match ds.dimension_names(Some("pr")) {
        Err(NcHelpersError::VariableNotFound { var }) => assert_eq!(var, "pr"),
        other => panic!("Expected VariableNotFound error, got {other:?}"),
    }
}

#[test]
fn test_median_step() {
    assert_eq!(
        median_step(aview1(&[0.0, 30.0, 60.0, 90.0, 121.0, 151.0])),
        Some(30.0)
    );
    assert_eq!(median_step(aview1(&[0.0, 1.0, 3.0])), Some(1.5));
    assert_eq!(median_step(aview1(&[5.0])), None);
    assert_eq!(median_step(Array1::<f64>::zeros(0).view()), None);
}

#[test]
fn test_median_step_of_strided_view() {
    // Every other value of a 6-hourly series is a 12-hourly series
    let values = Array1::range(0.0, 48.0, 6.0);
    assert_eq!(median_step(values.slice(s![..;2])), Some(12.0));
}

#[test]
fn test_concept_and_project_names() {
    assert_eq!(Concept::parse("model"), Some(Concept::Model));
    assert_eq!(Concept::parse("Model"), None);
    assert_eq!(ProjectFamily::parse("CMIP5"), Some(ProjectFamily::Cmip5));
    assert_eq!(ProjectFamily::parse("cmip5"), None);
    assert_eq!(Concept::Run.attribute(ProjectFamily::Cmip3), "realization");
}

#[test]
fn test_time_step_size_is_median_robust() {
    // Steps of 30, 30, 30, 31 and 30 days
    let ds = CfDataset::new(gridded(
        vec![0.0, 30.0, 60.0, 90.0, 121.0, 151.0],
        "days since 1950-01-01",
        "360_day",
    ));
    assert_eq!(ds.time_step_size().unwrap(), 30.0 * DAY);
    assert_eq!(ds.time_resolution().unwrap(), Resolution::Monthly);

    let hourly = CfDataset::new(gridded(
        vec![0.0, 6.0, 12.0, 18.0],
        "hours since 2000-01-01 00:00:00",
        "standard",
    ));
    assert_eq!(hourly.time_step_size().unwrap(), 21_600.0);
    assert_eq!(hourly.time_resolution().unwrap(), Resolution::SixHourly);
}

#[test]
fn test_resolution_classes() {
    assert_eq!(Resolution::from_step_seconds(DAY), Resolution::Daily);
    assert_eq!(Resolution::from_step_seconds(30.0 * DAY), Resolution::Monthly);
    assert_eq!(Resolution::from_step_seconds(31.0 * DAY), Resolution::Monthly);
    assert_eq!(Resolution::from_step_seconds(90.0 * DAY), Resolution::Seasonal);
    assert_eq!(Resolution::from_step_seconds(365.0 * DAY), Resolution::Yearly);
    assert_eq!(Resolution::from_step_seconds(360.0 * DAY), Resolution::Yearly);
    assert_eq!(Resolution::from_step_seconds(3_600.0), Resolution::Hourly);
    assert_eq!(Resolution::from_step_seconds(10.0 * DAY), Resolution::Other);
    assert_eq!(Resolution::from_step_seconds(f64::NAN), Resolution::Other);

    assert_eq!(Resolution::Monthly.to_string(), "monthly");
    assert_eq!(Resolution::Hourly.as_str(), "1-hourly");
}

#[test]
fn test_time_steps() {
    let steps = monthly_cmip5().time_steps().unwrap();
    assert_eq!(steps.variable, "time");
    assert_eq!(steps.units, "days since 1950-01-01");
    assert_eq!(steps.calendar, "365_day");
    assert_eq!(steps.numeric.len(), 12);
    assert_eq!(steps.datetime[1].format("%Y-%m-%d"), "1950-02-01");
    assert_eq!(steps.datetime[11].format("%Y-%m-%d"), "1950-12-01");
}

#[test]
fn test_time_steps_errors() {
    let no_time = CfDataset::new(
        MemoryDataset::new()
            .with_dimension("lat")
            .with_variable("lat", &["lat"], vec![]),
    );
    assert!(matches!(
        no_time.time_steps(),
        Err(NcHelpersError::MissingAxis { axis }) if axis == "T"
    ));

    let no_calendar = CfDataset::new(
        MemoryDataset::new()
            .with_dimension("time")
            .with_variable("time", &["time"], vec![0.0, 1.0])
            .with_variable_attribute("time", "units", "days since 1950-01-01"),
    );
    assert!(matches!(
        no_calendar.time_steps(),
        Err(NcHelpersError::MissingAttribute { var, attr }) if var == "time" && attr == "calendar"
    ));

    let bad_units = CfDataset::new(gridded(vec![0.0, 1.0], "months since 1950-01-01", "360_day"));
    assert!(matches!(
        bad_units.time_step_size(),
        Err(NcHelpersError::MalformedUnits { .. })
    ));

    let single = CfDataset::new(gridded(vec![0.0], "days since 1950-01-01", "360_day"));
    assert_eq!(single.time_range().unwrap(), (0.0, 0.0));
    assert!(matches!(
        single.time_step_size(),
        Err(NcHelpersError::InsufficientTimeSteps { count: 1, .. })
    ));
}

#[test]
fn test_time_range() {
    let ds = CfDataset::new(gridded(
        vec![334.0, 0.0, 31.0],
        "days since 1950-01-01",
        "365_day",
    ));
    assert_eq!(ds.time_range().unwrap(), (0.0, 334.0));
}

#[test]
fn test_time_range_formatted() {
    assert_eq!(monthly_cmip5().time_range_formatted().unwrap(), "195001-195012");

    let daily = CfDataset::new(gridded(
        (0..10).map(f64::from).collect(),
        "days since 2006-01-01",
        "standard",
    ));
    assert_eq!(daily.time_range_formatted().unwrap(), "20060101-20060110");

    let yearly = CfDataset::new(gridded(
        vec![0.0, 360.0, 720.0],
        "days since 1961-01-01",
        "360_day",
    ));
    assert_eq!(yearly.time_range_formatted().unwrap(), "1961-1963");

    let six_hourly = CfDataset::new(gridded(
        vec![0.0, 0.25, 0.5],
        "days since 2000-01-01",
        "standard",
    ));
    match six_hourly.time_range_formatted() {
        Err(NcHelpersError::UnsupportedResolution { resolution }) => {
            assert_eq!(resolution, "6-hourly")
        }
        other => panic!("Expected UnsupportedResolution error, got {other:?}"),
    }
}

#[test]
fn test_climatology_detection() {
    let plain = monthly_cmip5();
    assert_eq!(plain.climatology_bounds_var_name(), None);
    assert!(!plain.is_multi_year_mean());

    let climatology = CfDataset::new(
        plain
            .into_inner()
            .with_variable_attribute("time", "climatology", "climatology_bnds"),
    );
    assert_eq!(
        climatology.climatology_bounds_var_name().as_deref(),
        Some("climatology_bnds")
    );
    assert!(climatology.is_multi_year_mean());

    let empty = CfDataset::new(
        climatology
            .into_inner()
            .with_variable_attribute("time", "climatology", ""),
    );
    assert!(!empty.is_multi_year_mean());

    let no_time = CfDataset::new(MemoryDataset::new().with_dimension("lat"));
    assert_eq!(no_time.climatology_bounds_var_name(), None);
}

#[test]
fn test_dependent_variable_names() {
    let source = monthly_cmip5()
        .into_inner()
        .with_variable("pr", &["time", "lat", "lon"], vec![])
        .with_variable("lat_bnds", &["lat", "bnds"], vec![]);
    let ds = CfDataset::new(source);

    let vars: Vec<String> = ds.dependent_variable_names().into_iter().collect();
    assert_eq!(vars, names(&["pr", "tasmax"]));
}

#[test]
fn test_unified_metadata_cmip5() {
    let ds = monthly_cmip5();
    let meta = ds.metadata();
    assert_eq!(meta.institution().unwrap(), "CCCma");
    assert_eq!(meta.model().unwrap(), "CanESM2");
    assert_eq!(meta.emissions().unwrap(), "rcp85");
    assert_eq!(meta.run().unwrap(), "r1i1p1");
    assert_eq!(meta.project().unwrap(), "CMIP5");
    assert_eq!(meta.lookup("model").unwrap(), "CanESM2");
}

#[test]
fn test_unified_metadata_cmip3() {
    let source = MemoryDataset::new()
        .with_global_attribute("project_id", "CMIP3")
        .with_global_attribute("institute", "CCCma")
        .with_global_attribute("source", "CGCM3.1")
        .with_global_attribute("model_id", "not-this-one")
        .with_global_attribute("experiment_id", "sresa2")
        .with_global_attribute("realization", "1");
    let ds = CfDataset::new(source);
    let meta = ds.metadata();

    assert_eq!(meta.institution().unwrap(), "CCCma");
    assert_eq!(meta.model().unwrap(), "CGCM3.1");
    assert_eq!(meta.get(Concept::Emissions).unwrap(), "sresa2");
    assert_eq!(meta.run().unwrap(), "1");
    assert_eq!(meta.project().unwrap(), "CMIP3");
}

#[test]
fn test_unified_metadata_failures_are_uniform() {
    let unknown_family = CfDataset::new(
        MemoryDataset::new()
            .with_global_attribute("project_id", "CORDEX")
            .with_global_attribute("model_id", "CanRCM4"),
    );
    match unknown_family.metadata().model() {
        Err(NcHelpersError::UnresolvedMetadata { concept }) => assert_eq!(concept, "model"),
        other => panic!("Expected UnresolvedMetadata error, got {other:?}"),
    }

    let no_project = CfDataset::new(MemoryDataset::new().with_global_attribute("model_id", "x"));
    assert!(matches!(
        no_project.metadata().model(),
        Err(NcHelpersError::UnresolvedMetadata { .. })
    ));

    let ds = monthly_cmip5();
    let missing = CfDataset::new(ds.into_inner().with_global_attribute("project_id", "CMIP3"));
    assert!(matches!(
        missing.metadata().run(),
        Err(NcHelpersError::UnresolvedMetadata { concept }) if concept == "run"
    ));
    assert!(matches!(
        missing.metadata().lookup("ensemble"),
        Err(NcHelpersError::UnresolvedMetadata { concept }) if concept == "ensemble"
    ));
}

#[test]
fn test_unique_id_end_to_end() {
    let ds = monthly_cmip5();
    let id = ds.unique_id().unwrap();
    assert_eq!(id, "tasmax_monthly_CanESM2_rcp85_r1i1p1_195001-195012");

    // Deterministic across calls
    assert_eq!(ds.unique_id().unwrap(), id);
}

#[test]
fn test_unique_id_across_gregorian_reform() {
    // The standard calendar drops 1582-10-05 through 1582-10-14
    let days: Vec<f64> = (0..6).map(f64::from).collect();
    let ds = CfDataset::new(cmip5(gridded(days, "days since 1582-10-01", "standard")));
    assert_eq!(ds.time_resolution().unwrap(), Resolution::Daily);
    assert_eq!(ds.time_range_formatted().unwrap(), "15821001-15821016");
    assert_eq!(
        ds.unique_id().unwrap(),
        "tasmax_daily_CanESM2_rcp85_r1i1p1_15821001-15821016"
    );
}

#[test]
fn test_unique_id_julian_calendar() {
    // 1500 is a leap year in the Julian calendar
    let ds = CfDataset::new(cmip5(gridded(
        vec![0.0, 365.0, 731.0, 1_096.0],
        "days since 1499-01-01",
        "julian",
    )));
    assert_eq!(ds.time_step_size().unwrap(), 365.0 * DAY);
    assert_eq!(ds.time_resolution().unwrap(), Resolution::Yearly);
    assert_eq!(ds.time_steps().unwrap().datetime[2].to_string(), "1501-01-01 00:00:00");
    assert_eq!(
        ds.unique_id().unwrap(),
        "tasmax_yearly_CanESM2_rcp85_r1i1p1_1499-1502"
    );
}

#[test]
fn test_unique_id_joins_variables_and_replaces_plus() {
    let source = monthly_cmip5()
        .into_inner()
        .with_variable("tasmin", &["time", "lat", "lon"], vec![])
        .with_global_attribute("model_id", "HadGEM2+ES");
    let ds = CfDataset::new(source);

    assert_eq!(
        ds.unique_id().unwrap(),
        "tasmax-tasmin_monthly_HadGEM2-ES_rcp85_r1i1p1_195001-195012"
    );
}

#[test]
fn test_unique_id_axes_suffix() {
    // Z from a name, S from a compressed coordinate
    let source = monthly_cmip5()
        .into_inner()
        .with_dimension("plev")
        .with_variable("plev", &["plev"], vec![85_000.0])
        .with_variable_attribute("plev", "axis", "Z")
        .with_variable_attribute("lat", "axis", "Y")
        .with_variable_attribute("lat", "compress", "lat lon");
    let ds = CfDataset::new(source);

    assert_eq!(
        ds.unique_id().unwrap(),
        "tasmax_monthly_CanESM2_rcp85_r1i1p1_195001-195012_dimSTXZ"
    );

    // Only standard axes: no suffix, even with an attribute override
    let standard = CfDataset::new(
        monthly_cmip5()
            .into_inner()
            .with_variable_attribute("lat", "axis", "Z"),
    );
    assert!(standard.unique_id().unwrap().ends_with("_195001-195012"));
}

#[test]
fn test_unique_id_propagates_failures() {
    let ds = CfDataset::new(gridded(MONTH_STARTS.to_vec(), "days since 1950-01-01", "365_day"));
    assert!(matches!(
        ds.unique_id(),
        Err(NcHelpersError::UnresolvedMetadata { .. })
    ));
}

#[test]
fn test_fingerprint_requires_backing_file() {
    let ds = monthly_cmip5();
    assert!(matches!(
        ds.first_mib_digest(),
        Err(NcHelpersError::IoError(_))
    ));

    let missing = CfDataset::new(MemoryDataset::new().with_path("/non/existent/file.nc"));
    assert!(matches!(
        missing.first_mib_digest(),
        Err(NcHelpersError::IoError(_))
    ));
    assert!(missing.source().file_path().is_ok());
}
