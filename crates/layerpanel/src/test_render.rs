#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing::{Event, Level, Subscriber, subscriber};
    use tracing_subscriber::{
        layer::{Context, Layer},
        prelude::*,
    };

    use crate::*;

    fn h(s: &str) -> Handle {
        Handle::new(s).unwrap()
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_string()).collect()
    }

    /// `[A(base,show), B(base,show), C(overlay,show), D(overlay,hidden)]`
    fn abcd() -> Document {
        let mut doc = Document::new(h("map_1"));
        doc.add_child(TileLayer::new(h("a"), "A"))
            .add_child(TileLayer::new(h("b"), "B"))
            .add_child(FeatureLayer::new(h("c"), "C"))
            .add_child(FeatureLayer::new(h("d"), "D").show(false));
        doc
    }

    fn overlay_rows(panel: &RenderedPanel) -> Vec<Vec<(String, String)>> {
        panel
            .config
            .overlays
            .as_ref()
            .unwrap()
            .iter()
            .map(|g| {
                g.layers
                    .iter()
                    .map(|e| (e.name.clone(), e.icon.clone().unwrap()))
                    .collect()
            })
            .collect()
    }

    fn suppressed_names(panel: &RenderedPanel) -> Vec<&str> {
        panel
            .config
            .suppressed
            .iter()
            .map(|s| s.name.as_str())
            .collect()
    }

    #[test]
    fn default_panel_end_to_end() {
        let mut doc = abcd();
        let panel = PanelCompiler::new(&PanelOptions::default())
            .unwrap()
            .render(&mut doc)
            .unwrap();

        let groups = panel.config.overlays.as_ref().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(
            overlay_rows(&panel)[0],
            vec![
                ("C".to_string(), "<i></i>".to_string()),
                ("D".to_string(), "<i></i>".to_string())
            ]
        );
        assert_eq!(suppressed_names(&panel), vec!["B", "D"]);

        let base = panel.config.base.as_ref().unwrap();
        assert_eq!(base.collapsed, Some(true));
        let base_names: Vec<_> = base.layers.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(base_names, vec!["A", "B"]);
        assert!(base.layers.iter().all(|e| e.icon.is_none()));
    }

    #[test]
    fn nested_groups_with_matching_icons() {
        let mut doc = abcd();
        let opts = PanelOptions {
            groups: strings(&["Roads", "Water"]),
            group_by: GroupBy::Nested(vec![strings(&["C"]), strings(&["D"])]),
            icons: Some(IconConfig::Nested(vec![
                vec![IconSource::Name("road-icon".into())],
                vec![IconSource::Name("water-icon".into())],
            ])),
            ..PanelOptions::default()
        };
        let panel = PanelCompiler::new(&opts).unwrap().render(&mut doc).unwrap();
        let groups = panel.config.overlays.as_ref().unwrap();
        assert_eq!(groups[0].group, "Roads");
        assert_eq!(groups[1].group, "Water");
        assert_eq!(
            overlay_rows(&panel),
            vec![
                vec![(
                    "C".to_string(),
                    r#"<i class="fa fa-road-icon"></i>"#.to_string()
                )],
                vec![(
                    "D".to_string(),
                    r#"<i class="fa fa-water-icon"></i>"#.to_string()
                )],
            ]
        );
        assert_eq!(groups[1].layers[0].layer, h("d"));
    }

    #[test]
    fn group_count_mismatch_aborts_without_assets() {
        let mut doc = abcd();
        let opts = PanelOptions {
            groups: strings(&["Roads", "Water"]),
            group_by: GroupBy::Nested(vec![strings(&["C"])]),
            ..PanelOptions::default()
        };
        let err = PanelCompiler::new(&opts)
            .unwrap()
            .render(&mut doc)
            .unwrap_err();
        assert_eq!(err, Error::GroupCountMismatch { names: 2, lists: 1 });
        assert!(doc.header().is_empty());
    }

    #[test]
    fn render_is_idempotent() {
        let mut doc = abcd();
        let opts = PanelOptions {
            icons: Some(IconConfig::Flat(vec![IconSource::Name("road".into())])),
            ..PanelOptions::default()
        };
        let compiler = PanelCompiler::new(&opts).unwrap();
        let first = compiler.render(&mut doc).unwrap();
        let header_after_first = doc.header().to_vec();
        let second = compiler.render(&mut doc).unwrap();

        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        assert_eq!(first.script().to_string(), second.script().to_string());
        assert_eq!(doc.header(), header_after_first.as_slice());
        // Panel CSS, panel JS and the icon font.
        assert_eq!(doc.header().len(), 3);
    }

    #[test]
    fn rerender_picks_up_late_layers() {
        let mut doc = abcd();
        let compiler = PanelCompiler::new(&PanelOptions::default()).unwrap();
        let before = compiler.render(&mut doc).unwrap();
        doc.add_child(FeatureLayer::new(h("e"), "E").show(false));
        let after = compiler.render(&mut doc).unwrap();
        assert_eq!(suppressed_names(&before), vec!["B", "D"]);
        assert_eq!(suppressed_names(&after), vec!["B", "D", "E"]);
        assert_eq!(overlay_rows(&after)[0].len(), 3);
    }

    #[test]
    fn icon_font_requested_only_for_font_prefix() {
        let mut doc = abcd();
        PanelCompiler::new(&PanelOptions::default())
            .unwrap()
            .render(&mut doc)
            .unwrap();
        assert_eq!(doc.header().len(), 2);
        assert!(
            doc.header()
                .iter()
                .all(|a| !a.locator.contains("font-awesome"))
        );

        let mut doc = abcd();
        let opts = PanelOptions {
            icons: Some(IconConfig::Flat(vec![IconSource::Name("leaf".into())])),
            icon_prefix: "glyphicon".into(),
            ..PanelOptions::default()
        };
        PanelCompiler::new(&opts).unwrap().render(&mut doc).unwrap();
        assert_eq!(doc.header().len(), 2);
    }

    #[test]
    fn raster_only_keeps_base_suppression() {
        let mut doc = abcd();
        let opts = PanelOptions {
            only_raster: true,
            ..PanelOptions::default()
        };
        let panel = PanelCompiler::new(&opts).unwrap().render(&mut doc).unwrap();
        assert!(panel.config.overlays.is_none());
        assert_eq!(suppressed_names(&panel), vec!["B"]);
        let script = panel.script().to_string();
        assert!(script.contains("var overLayers = null;"));
        assert!(script.contains("b.remove();"));
        assert!(!script.contains("d.remove();"));
    }

    #[test]
    fn vector_only_drops_base_group() {
        let mut doc = abcd();
        let opts = PanelOptions {
            only_vector: true,
            ..PanelOptions::default()
        };
        let panel = PanelCompiler::new(&opts).unwrap().render(&mut doc).unwrap();
        assert!(panel.config.base.is_none());
        assert_eq!(suppressed_names(&panel), vec!["D"]);
    }

    #[test]
    fn detached_document_fails_loudly() {
        let mut doc = Document::detached();
        doc.add_child(FeatureLayer::new(h("c"), "C"));
        let err = PanelCompiler::new(&PanelOptions::default())
            .unwrap()
            .render(&mut doc)
            .unwrap_err();
        assert_eq!(err, Error::NoAttachment);
        assert!(doc.header().is_empty());
    }

    #[test]
    fn single_base_layer_suppresses_only_hidden_overlays() {
        let mut doc = Document::new(h("m"));
        doc.add_child(TileLayer::new(h("a"), "A"))
            .add_child(FeatureLayer::new(h("c"), "C"))
            .add_child(FeatureLayer::new(h("d"), "D").show(false))
            .add_child(FeatureLayer::new(h("e"), "E"));
        let panel = PanelCompiler::new(&PanelOptions::default())
            .unwrap()
            .render(&mut doc)
            .unwrap();
        assert_eq!(suppressed_names(&panel), vec!["D"]);
    }

    #[test]
    fn script_shape() {
        let mut doc = abcd();
        let opts = PanelOptions {
            title: Some("Layers".into()),
            data_group_name: "Data".into(),
            ..PanelOptions::default()
        };
        let panel = PanelCompiler::new(&opts).unwrap().render(&mut doc).unwrap();
        let expected = concat!(
            "var baseLayers = [\n",
            "    {\"group\": \" \", \"collapsed\": true, \"layers\": [\n",
            "        {\"name\": \"A\", \"layer\": a},\n",
            "        {\"name\": \"B\", \"layer\": b},\n",
            "    ]}];\n",
            "var overLayers = [\n",
            "    {\"group\": \"Data\", \"layers\": [\n",
            "        {\"name\": \"C\", \"icon\": \"<i><\\/i>\", \"layer\": c},\n",
            "        {\"name\": \"D\", \"icon\": \"<i><\\/i>\", \"layer\": d},\n",
            "    ]},\n",
            "];\n",
            "var panelLayers = new L.Control.PanelLayers(baseLayers, overLayers, ",
            "{\"title\":\"Layers\",\"collapsed\":true,\"collapsibleGroups\":true});\n",
            "map_1.addControl(panelLayers);\n",
            "b.remove();\n",
            "d.remove();\n",
        );
        assert_eq!(panel.script().to_string(), expected);
    }

    #[test]
    fn script_literals_cannot_close_the_script_element() {
        let mut doc = Document::new(h("m"));
        doc.add_child(FeatureLayer::new(h("x"), "</script><b>"));
        let opts = PanelOptions {
            title: Some("</SCRIPT>".into()),
            ..PanelOptions::default()
        };
        let panel = PanelCompiler::new(&opts).unwrap().render(&mut doc).unwrap();
        let script = panel.script().to_string();
        assert!(!script.contains("</"), "{script}");
        assert!(script.contains(r#""<\/script><b>""#));
        // JSON output is not embedded in HTML and stays unescaped.
        assert!(panel.to_json().unwrap().contains("</script><b>"));
    }

    #[test]
    fn flat_group_name_count_fails_at_render() {
        let mut doc = abcd();
        let opts = PanelOptions {
            groups: strings(&["Roads", "Water"]),
            group_by: GroupBy::Flat(strings(&["C"])),
            ..PanelOptions::default()
        };
        let compiler = PanelCompiler::new(&opts).unwrap();
        let err = compiler.render(&mut doc).unwrap_err();
        assert_eq!(err, Error::GroupCountMismatch { names: 2, lists: 1 });
        assert!(doc.header().is_empty());

        let opts = PanelOptions {
            groups: strings(&["Roads"]),
            group_by: GroupBy::Flat(strings(&["C"])),
            ..PanelOptions::default()
        };
        let panel = PanelCompiler::new(&opts).unwrap().render(&mut doc).unwrap();
        assert_eq!(panel.config.overlays.as_ref().unwrap()[0].group, "Roads");
    }

    #[test]
    fn base_and_overlay_sharing_a_name_both_suppressed() {
        let mut doc = Document::new(h("m"));
        doc.add_child(TileLayer::new(h("a"), "A"))
            .add_child(TileLayer::new(h("x_base"), "X"))
            .add_child(FeatureLayer::new(h("x_over"), "X").show(false));
        let opts = PanelOptions {
            only_raster: true,
            ..PanelOptions::default()
        };
        let panel = PanelCompiler::new(&opts).unwrap().render(&mut doc).unwrap();
        let script = panel.script().to_string();
        assert!(script.contains("x_base.remove();"));
        assert!(!script.contains("x_over.remove();"));
    }

    #[test]
    fn json_shape() {
        let mut doc = abcd();
        let panel = PanelCompiler::new(&PanelOptions {
            only_vector: true,
            ..PanelOptions::default()
        })
        .unwrap()
        .render(&mut doc)
        .unwrap();
        let v: serde_json::Value = serde_json::from_str(&panel.to_json().unwrap()).unwrap();
        assert_eq!(v["map"], "map_1");
        assert!(v["config"]["base"].is_null());
        assert_eq!(v["config"]["overlays"][0]["layers"][1]["layer"], "d");
        assert_eq!(v["config"]["suppressed"][0]["name"], "D");
        assert!(v["config"]["overlays"][0].get("collapsed").is_none());
    }

    /// Collects the levels of events emitted during a test.
    #[derive(Clone, Default)]
    struct Levels(Arc<Mutex<Vec<Level>>>);

    impl<S: Subscriber> Layer<S> for Levels {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    #[test]
    fn lenient_icon_fallback_warns() {
        let levels = Levels::default();
        let subscriber = tracing_subscriber::registry().with(levels.clone());
        subscriber::with_default(subscriber, || {
            let mut doc = abcd();
            let opts = PanelOptions {
                groups: strings(&["Roads", "Water"]),
                group_by: GroupBy::Nested(vec![strings(&["C"]), strings(&["D"])]),
                icons: Some(IconConfig::Nested(vec![vec![IconSource::Name(
                    "road".into(),
                )]])),
                ..PanelOptions::default()
            };
            let panel = PanelCompiler::new(&opts).unwrap().render(&mut doc).unwrap();
            assert_eq!(overlay_rows(&panel)[1][0].1, "<i></i>");
        });
        assert!(levels.0.lock().unwrap().contains(&Level::WARN));
    }

    #[test]
    fn strict_icons_turn_fallback_into_error() {
        let mut doc = abcd();
        let opts = PanelOptions {
            groups: strings(&["Roads", "Water"]),
            group_by: GroupBy::Nested(vec![strings(&["C"]), strings(&["D"])]),
            icons: Some(IconConfig::Nested(vec![vec![IconSource::Name(
                "road".into(),
            )]])),
            strict_icons: true,
            ..PanelOptions::default()
        };
        let err = PanelCompiler::new(&opts)
            .unwrap()
            .render(&mut doc)
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
