use kpt_kcl::core::config::{
    resolve, ConfigVariant, KclRun, CONFIG_MAP_KIND, DEFAULT_PROGRAM_NAME, KCL_RUN_KIND,
};
use kpt_kcl::core::resource::KubeObject;
use kpt_kcl::core::types::ErrorCategory;
use serde_json::json;

fn object(text: &str) -> KubeObject {
    KubeObject::parse(text).expect("parse function config")
}

#[test]
fn config_map_scenario_cm1() {
    let run = resolve(Some(&object(
        r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: cm1
  namespace: ns1
data:
  source: "print(1)"
"#,
    )))
    .expect("resolve");

    assert_eq!(run.name, "cm1");
    assert_eq!(run.namespace, "ns1");
    assert_eq!(run.source, "print(1)");
    assert_eq!(run.params.len(), 1);
    assert_eq!(run.params["source"], json!("print(1)"));
}

#[test]
fn config_map_reserved_key_is_duplicated_into_params() {
    for source in ["a = 1", "print(\"hello\")", "x"] {
        let text = format!(
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cm\ndata:\n  source: '{}'\n  a: \"1\"\n",
            source
        );
        let run = resolve(Some(&object(&text))).expect("resolve");
        assert_eq!(run.source, source);
        assert_eq!(run.params.len(), 2);
        assert_eq!(run.params["source"], json!(source));
        assert_eq!(run.params["a"], json!("1"));
    }
}

#[test]
fn kcl_run_is_taken_as_is() {
    let run = resolve(Some(&object(
        r#"
apiVersion: fn.kpt.dev/v1alpha1
kind: KCLRun
metadata:
  name: set-annotation
  namespace: default
source: |
  [resource | {metadata.annotations: {managed-by = "kcl"}} for resource in option("items")]
params:
  toAdd:
    config.kubernetes.io/local-config: "true"
  count: 2
  ratio: 0.5
  flag: false
  nothing: null
"#,
    )))
    .expect("resolve");

    assert_eq!(run.name, "set-annotation");
    assert_eq!(run.namespace, "default");
    assert!(run.source.starts_with("[resource |"));
    assert_eq!(
        run.params["toAdd"],
        json!({"config.kubernetes.io/local-config": "true"})
    );
    assert_eq!(run.params["count"], json!(2));
    assert_eq!(run.params["ratio"], json!(0.5));
    assert_eq!(run.params["flag"], json!(false));
    assert_eq!(run.params["nothing"], json!(null));
}

#[test]
fn kcl_run_with_empty_name_gets_default() {
    let run = resolve(Some(&object(
        "apiVersion: fn.kpt.dev/v1alpha1\nkind: KCLRun\nsource: x\n",
    )))
    .expect("resolve");
    assert_eq!(
        run,
        KclRun {
            name: DEFAULT_PROGRAM_NAME.to_string(),
            source: "x".to_string(),
            ..Default::default()
        }
    );
    assert_eq!(run.name, "kcl-function-run");
}

#[test]
fn kcl_run_without_params_has_empty_params() {
    let run = resolve(Some(&object(
        "apiVersion: fn.kpt.dev/v1alpha1\nkind: KCLRun\nmetadata:\n  name: n\nsource: x\nparams: null\n",
    )))
    .expect("resolve");
    assert!(run.params.is_empty());
}

#[test]
fn empty_source_fails_even_with_name() {
    let err = resolve(Some(&object(
        "apiVersion: fn.kpt.dev/v1alpha1\nkind: KCLRun\nmetadata:\n  name: named\nsource: \"\"\n",
    )))
    .unwrap_err();
    assert_eq!(err.category, ErrorCategory::SourceRequired);
    assert_eq!(err.code, "KCL-CFG-004");
}

#[test]
fn missing_source_fails_after_name_defaulting() {
    let err = resolve(Some(&object(
        "apiVersion: fn.kpt.dev/v1alpha1\nkind: KCLRun\n",
    )))
    .unwrap_err();
    assert_eq!(err.category, ErrorCategory::SourceRequired);
    assert_eq!(err.context.get("name"), Some(&DEFAULT_PROGRAM_NAME.to_string()));
}

#[test]
fn absent_config_is_config_missing() {
    let err = resolve(None).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConfigMissing);
    assert!(err.message.contains(CONFIG_MAP_KIND));
    assert!(err.message.contains(KCL_RUN_KIND));
}

#[test]
fn unsupported_kind_names_all_three_identities() {
    let err = resolve(Some(&object(
        "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n",
    )))
    .unwrap_err();
    assert_eq!(err.category, ErrorCategory::UnsupportedConfigKind);
    insta::assert_snapshot!(
        err.message,
        @"`functionConfig` must be either /v1, Kind=ConfigMap or fn.kpt.dev/v1alpha1, Kind=KCLRun, but we got: apps/v1, Kind=Deployment"
    );
}

#[test]
fn unsupported_kind_with_wrong_version() {
    let err = resolve(Some(&object(
        "apiVersion: fn.kpt.dev/v1beta1\nkind: KCLRun\nsource: x\n",
    )))
    .unwrap_err();
    assert_eq!(err.category, ErrorCategory::UnsupportedConfigKind);
    assert!(err.message.contains(&ConfigVariant::config_map_identity().to_string()));
    assert!(err.message.contains(&ConfigVariant::kcl_run_identity().to_string()));
    assert!(err.message.contains("fn.kpt.dev/v1beta1, Kind=KCLRun"));
}

#[test]
fn null_config_map_values_read_as_empty_strings() {
    let cm = object("apiVersion: v1\nkind: ConfigMap\ndata:\n  source: print(1)\n  empty: null\n");
    let run = resolve(Some(&cm)).expect("resolve");
    assert_eq!(run.params["empty"], json!(""));

    let err = resolve(Some(&object(
        "apiVersion: v1\nkind: ConfigMap\ndata:\n  source: ~\n",
    )))
    .unwrap_err();
    assert_eq!(err.category, ErrorCategory::SourceRequired);
    assert_eq!(err.code, "KCL-CFG-004");
}

#[test]
fn malformed_config_map_data_is_decode_failure() {
    let err = resolve(Some(&object(
        "apiVersion: v1\nkind: ConfigMap\ndata:\n  - source\n",
    )))
    .unwrap_err();
    assert_eq!(err.category, ErrorCategory::DecodeFailure);
    assert_eq!(err.code, "KCL-CFG-003");
}

#[test]
fn variant_conversion_does_not_alias_input() {
    let cm = object("apiVersion: v1\nkind: ConfigMap\ndata:\n  source: x\n");
    let variant = ConfigVariant::from_object(&cm).expect("variant");
    assert_eq!(variant.kind(), CONFIG_MAP_KIND);
    let run = KclRun::from(variant);
    drop(cm);
    assert_eq!(run.source, "x");
}
