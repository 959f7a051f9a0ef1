//! End-to-end driver tests against a canned transport

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use metsainfo::Value;
use metsaregister::{query_forest_notifications, query_forest_stands, RegistryClient};

const EMPTY_RESPONSE: &str = "<objects>0 objects</objects>";

struct StubClient {
    layers: HashMap<u32, String>,
    pages: HashMap<String, String>,
    info_requests: AtomicUsize,
}

impl StubClient {
    fn new() -> Self {
        Self {
            layers: HashMap::new(),
            pages: HashMap::new(),
            info_requests: AtomicUsize::new(0),
        }
    }
}

impl RegistryClient for StubClient {
    async fn layer_list(&self) -> Result<String> {
        Ok("<groups/>".to_string())
    }

    async fn query_layer(&self, _aoi: &str, layer_id: u32) -> Result<String> {
        Ok(self
            .layers
            .get(&layer_id)
            .cloned()
            .unwrap_or_else(|| EMPTY_RESPONSE.to_string()))
    }

    async fn fetch_info(&self, url: &str) -> Result<String> {
        self.info_requests.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url) {
            Some(page) => Ok(page.clone()),
            None => bail!("no canned page for {url}"),
        }
    }
}

fn stand_page(area: &str) -> String {
    format!(
        r##"<html><body>
        <table>
            <tr><th colspan="2" id="grpHeader"><a href="#" onclick="window.print();">Prindi</a></th></tr>
            <tr><td>Kinnistu Männiku, katastritunnus 30101:001:0042, eraldis 3, kvartal 7</td></tr>
            <tr><td>Eraldise pindala: {area} ha</td></tr>
            <tr><td>Arenguklass: keskealine mets</td></tr>
        </table>
        <table><tr><td>legend</td></tr></table>
        <table>
            <tr><th>Rinne</th><th>Puuliik</th><th>%</th><th>H</th><th>Vanus</th></tr>
            <tr><td>Esimene</td><td>Kuusk</td><td>100</td><td>18</td><td>40</td></tr>
        </table>
        </body></html>"##
    )
}

fn notification_page() -> String {
    r##"<html><body>
    <table>
        <tr><th colspan="2" id="grpHeader"><a href="#" onclick="window.print();">Prindi</a></th></tr>
        <tr><td>Teatise number</td><td>123</td></tr>
    </table>
    <table>
        <tr><th>Kv</th><th>Er</th><th>P</th><th>Töö</th></tr>
        <tr class="selected"><td>-</td><td>3</td><td>2,5</td><td>lageraie 132 tm</td></tr>
    </table>
    </body></html>"##
        .to_string()
}

fn objects_xml(entries: &[(&str, Option<&str>)]) -> String {
    let mut xml = String::from("<objects>");
    for (id, url) in entries {
        xml.push_str(&format!(r#"<obj id="{id}" label="-">"#));
        xml.push_str("<wkt>POLYGON((0 0,10 0,10 10,0 10,0 0))</wkt>");
        if let Some(url) = url {
            xml.push_str(&format!("<url>{url}</url>"));
        }
        xml.push_str("</obj>");
    }
    xml.push_str("</objects>");
    xml
}

#[tokio::test]
async fn test_empty_layers_never_touch_the_detail_endpoint() {
    let client = StubClient::new();
    let table = query_forest_stands(&client, "POLYGON((0 0,1 0,1 1,0 0))", Duration::ZERO)
        .await
        .unwrap();
    assert!(table.features.is_empty());
    assert!(table.columns.is_empty());
    assert_eq!(client.info_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stands_joined_across_layers_with_column_union() {
    let mut client = StubClient::new();
    client.layers.insert(
        11,
        objects_xml(&[("1001", Some("info.php%3Fid%3D1001"))]),
    );
    // State forest layer contributes a feature without a detail page
    client.layers.insert(12, objects_xml(&[("2001", None)]));
    client
        .pages
        .insert("info.php?id=1001".to_string(), stand_page("2,5"));

    let table = query_forest_stands(&client, "POLYGON((0 0,1 0,1 1,0 0))", Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(table.features.len(), 2);
    assert_eq!(client.info_requests.load(Ordering::SeqCst), 1);

    let enriched = &table.features[0];
    assert_eq!(
        enriched.attributes.get("Katastritunnus"),
        Some(&Value::Text("30101:001:0042".into()))
    );
    assert_eq!(
        enriched.attributes.get("Eraldise pindala (ha)"),
        Some(&Value::Float(2.5))
    );
    assert_eq!(
        enriched.attributes.get("Pealiik"),
        Some(&Value::Text("kuusk".into()))
    );
    // "-" labels are treated as absent
    assert!(enriched.label.is_none());

    let bare = &table.features[1];
    assert!(bare.attributes.is_empty());

    // Column union covers the enriched feature's fields
    assert!(table.columns.iter().any(|c| c == "Katastritunnus"));
    assert!(table.columns.iter().any(|c| c == "Kõrgus"));
}

#[tokio::test]
async fn test_unparseable_page_is_skipped_not_fatal() {
    let mut client = StubClient::new();
    client.layers.insert(
        11,
        objects_xml(&[
            ("1", Some("info.php%3Fid%3D1")),
            ("2", Some("info.php%3Fid%3D2")),
        ]),
    );
    client
        .pages
        .insert("info.php?id=1".to_string(), "<html><body>oops</body></html>".to_string());
    client
        .pages
        .insert("info.php?id=2".to_string(), stand_page("1,0"));

    let table = query_forest_stands(&client, "POLYGON((0 0,1 0,1 1,0 0))", Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(table.features.len(), 2);
    assert!(table.features[0].attributes.is_empty());
    assert_eq!(
        table.features[1].attributes.get("Eraldise pindala (ha)"),
        Some(&Value::Float(1.0))
    );
}

#[tokio::test]
async fn test_notifications_use_the_notification_parser() {
    let mut client = StubClient::new();
    client.layers.insert(
        10,
        objects_xml(&[("5001", Some("teatis.php%3Fid%3D5001"))]),
    );
    client
        .pages
        .insert("teatis.php?id=5001".to_string(), notification_page());

    let table =
        query_forest_notifications(&client, "POLYGON((0 0,1 0,1 1,0 0))", Duration::ZERO)
            .await
            .unwrap();

    assert_eq!(table.features.len(), 1);
    let attrs = &table.features[0].attributes;
    assert_eq!(attrs.get("Teatise number"), Some(&Value::Float(123.0)));
    assert_eq!(attrs.get("Eraldis"), Some(&Value::Float(3.0)));
    assert_eq!(attrs.get("Pindala (ha)"), Some(&Value::Float(2.5)));
    assert_eq!(attrs.get("Töö"), Some(&Value::Text("lageraie".into())));
    assert_eq!(attrs.get("Maht (tm)"), Some(&Value::Float(132.0)));
    // Placeholder quarter normalizes to missing at the driver level
    assert_eq!(attrs.get("Kv"), Some(&Value::Missing));
}
