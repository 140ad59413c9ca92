use std::collections::BTreeSet;

use proptest::prelude::*;
use themewatch::entries::{EntrypointMap, VALID_TEMPLATES};
use themewatch::render::{render_script_tags, render_style_tags};
use themewatch::types::Mode;
use themewatch_test_utils::builders::entrypoints;

fn catalogue() -> EntrypointMap {
    let mut pairs: Vec<(String, String)> = VALID_TEMPLATES
        .iter()
        .map(|t| (format!("templates.{t}"), format!("src/scripts/templates/{t}.js")))
        .collect();
    pairs.push(("layout.theme".to_string(), "src/scripts/layout/theme.js".to_string()));
    let refs: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    entrypoints(&refs)
}

/// A generated filename made of 1..=3 distinct known segments plus a hash.
fn bundle_name() -> impl Strategy<Value = (String, usize)> {
    let segment = prop_oneof![
        Just("layout.theme".to_string()),
        proptest::sample::select(VALID_TEMPLATES).prop_map(|t| format!("templates.{t}")),
    ];
    (
        proptest::collection::btree_set(segment, 1..=3),
        "[0-9a-f]{6}",
        any::<bool>(),
    )
        .prop_map(|(segments, hash, with_vendor): (BTreeSet<String>, String, bool)| {
            let mut parts: Vec<String> = segments.into_iter().collect();
            let count = parts.len();
            if with_vendor {
                parts.insert(0, "vendors".to_string());
            }
            (format!("{}.{hash}", parts.join("@")), count)
        })
}

proptest! {
    #[test]
    fn one_block_per_bundle_with_one_condition_per_segment(
        (stem, segments) in bundle_name()
    ) {
        let entries = catalogue();
        let file = format!("{stem}.js");

        let out = render_script_tags(&[file.as_str()], &entries, Mode::Production).unwrap();

        prop_assert_eq!(out.matches("{%- if").count(), 1);
        prop_assert_eq!(out.matches("{%- endif -%}").count(), 1);
        prop_assert_eq!(out.matches(" == '").count(), segments);
        prop_assert_eq!(out.matches(" or ").count(), segments - 1);
    }

    #[test]
    fn modes_differ_only_in_asset_source((stem, _) in bundle_name()) {
        let entries = catalogue();
        let file = format!("{stem}.css");

        let prod = render_style_tags(&[file.as_str()], &entries, Mode::Production).unwrap();
        let dev = render_style_tags(&[file.as_str()], &entries, Mode::Development).unwrap();

        let prod_src = format!("{{{{ '{file}' | asset_url }}}}");
        let dev_src = format!("https://localhost:3000/assets/{file}");
        prop_assert_eq!(prod.replace(&prod_src, "SRC"), dev.replace(&dev_src, "SRC"));
    }
}
