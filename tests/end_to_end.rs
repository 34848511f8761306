mod common;

use approx::assert_relative_eq;
use common::{init_tracing, quick_config};
use offspring_stats::execution::sequential;
use offspring_stats::offspring_fit::mle::THETA_BOUNDS;
use offspring_stats::prelude::*;
use offspring_stats::{BetaParameter, SensitivityAxes};

const MODEL_KEYS: [&str; 5] = ["poisson", "geometric", "negative binomial", "zip", "beta-Poisson"];

#[test]
fn plague_report_has_every_model() -> anyhow::Result<()> {
    init_tracing();
    let report = run_analysis(&quick_config("plague", 30), &DatasetRegistry::builtin())?;

    assert_eq!(report.dataset.n, 40);
    assert_relative_eq!(report.dataset.mean, 1.325);
    assert_eq!(report.dataset.superspreading_threshold, 5);
    assert!(report.failed_models.is_empty(), "{:?}", report.failed_models);
    assert_eq!(report.models.keys().count(), 5);
    for key in MODEL_KEYS {
        let model = &report.models[key];
        assert_eq!(model.parameters.len(), model.parameter_names.len());
        assert_eq!(model.intervals.len(), model.parameters.len());
        assert!(model.log_likelihood <= report.dataset.empirical_log_likelihood + 1e-9, "{key}");
        assert_eq!(model.successful_resamples + model.failed_resamples, 30, "{key}");
        assert_eq!(model.quantities.len(), 5, "{key}");
    }
    Ok(())
}

#[test]
fn plague_point_estimates() -> anyhow::Result<()> {
    let config = quick_config("plague", 20).with_models(vec![
        ModelKind::Poisson,
        ModelKind::Geometric,
        ModelKind::NegativeBinomial,
        ModelKind::BetaPoisson,
    ]);
    let report = run_analysis(&config, &DatasetRegistry::builtin())?;

    for kind in [ModelKind::Poisson, ModelKind::Geometric, ModelKind::NegativeBinomial] {
        assert_relative_eq!(report.model(kind).unwrap().parameters[0], 1.325, max_relative = 1e-12);
    }
    let theta = report.model(ModelKind::NegativeBinomial).unwrap().parameters[1];
    assert!(THETA_BOUNDS.contains(theta));

    let bp = report.model(ModelKind::BetaPoisson).unwrap();
    assert_eq!(bp.parameter_names, vec!["lambda", "phi", "nu"]);
    let (lambda, nu) = (bp.parameters[0], bp.parameters[2]);
    assert!(nu >= 0.0 && lambda * nu <= 1.0 + 1e-9);
    assert!(bp.joint_region.as_ref().map_or(true, |r| r.dimension() == 3));

    // Overdispersed data: every extra parameter improves on Poisson
    let poisson_llh = report.model(ModelKind::Poisson).unwrap().log_likelihood;
    assert!(report.model(ModelKind::NegativeBinomial).unwrap().log_likelihood >= poisson_llh);
    Ok(())
}

#[test]
fn quantities_are_probabilities_where_they_should_be() -> anyhow::Result<()> {
    let config = quick_config("noro", 40).with_models(vec![ModelKind::NegativeBinomial, ModelKind::Zip]);
    let report = run_analysis(&config, &DatasetRegistry::builtin())?;
    for model in report.models.values() {
        for key in ["p0", "superspreading", "extinction"] {
            let value = model.quantity(key).and_then(|q| q.value).unwrap();
            assert!((0.0..=1.0).contains(&value), "{key} = {value}");
        }
        let overdispersion = model.quantity("overdispersion").and_then(|q| q.value).unwrap();
        assert!(overdispersion >= 0.0);
    }
    Ok(())
}

#[test]
fn percentile_intervals_can_be_selected() -> anyhow::Result<()> {
    let config = quick_config("mers", 200)
        .with_models(vec![ModelKind::Poisson])
        .with_interval_method(IntervalMethod::Percentile)
        .with_stages(Stages::parameters_only());
    let report = run_analysis(&config, &DatasetRegistry::builtin())?;
    assert_eq!(report.interval_method, IntervalMethod::Percentile);

    let poisson = report.model(ModelKind::Poisson).unwrap();
    let ci = poisson.interval("lambda").unwrap();
    assert!(ci.lower < ci.upper);
    assert!(ci.contains(report.dataset.mean));
    assert!(poisson.quantities.is_empty());
    Ok(())
}

#[test]
fn report_serializes_with_stable_keys() -> anyhow::Result<()> {
    let config = quick_config("fasina_ebola", 20).with_models(vec![ModelKind::Poisson, ModelKind::Zip]);
    let report = run_analysis(&config, &DatasetRegistry::builtin())?;
    let json: serde_json::Value = serde_json::from_str(&report.to_json()?)?;

    assert_eq!(json["dataset"]["name"], "fasina_ebola");
    assert_eq!(json["resamples"]["requested"], 20);
    assert_eq!(json["models"]["zip"]["parameter_names"][1], "sigma");
    assert!(json["models"]["poisson"]["log_likelihood"].is_number());
    assert!(json["models"].get("geometric").is_none());
    Ok(())
}

#[test]
fn configuration_errors_fail_fast() {
    let registry = DatasetRegistry::builtin();
    let unknown = AnalysisConfig::new("ebola_2030").with_workers(1);
    assert!(matches!(run_analysis(&unknown, &registry), Err(Error::Configuration(_))));
    let no_workers = quick_config("plague", 10).with_workers(0);
    assert!(matches!(run_analysis(&no_workers, &registry), Err(Error::Configuration(_))));
    let bad_level = quick_config("plague", 10).with_confidence_level(0.0);
    assert!(matches!(run_analysis(&bad_level, &registry), Err(Error::Configuration(_))));
}

#[test]
fn custom_datasets_run_through_the_registry() -> anyhow::Result<()> {
    let registry = DatasetRegistry::new().with_dataset("household", vec![0, 0, 0, 1, 1, 2, 3, 8]);
    let config = quick_config("household", 25).with_models(vec![ModelKind::Geometric]);
    let report = run_analysis(&config, &registry)?;
    assert_eq!(report.dataset.n, 8);
    assert_eq!(report.resamples.completed + report.resamples.exhausted, 25);
    Ok(())
}

#[test]
fn sensitivity_curves_peak_near_the_fit() -> anyhow::Result<()> {
    let config = quick_config("plague", 10).with_models(vec![ModelKind::BetaPoisson]);
    let fitted = Analysis::from_registry(config, &DatasetRegistry::builtin())?;
    let axes = SensitivityAxes::new(
        (1..30).map(|i| i as f64 / 10.0).collect(),
        vec![0.5, 1.0, 2.0],
        vec![0.0, 0.1, 0.2],
    )?;
    let report = fitted.sensitivity(&axes, &sequential())?;
    let (best_lambda, _) = report.curve(BetaParameter::Lambda).unwrap().argmax().unwrap();
    assert!((best_lambda - 1.325).abs() <= 0.2, "peak at {best_lambda}");
    Ok(())
}
