use std::sync::Mutex;

use camino::Utf8PathBuf;

use g2ko::app::{App, FetchOptions};
use g2ko::domain::{OrganismCode, OrganismRequest};
use g2ko::error::G2koError;
use g2ko::kegg::KeggClient;
use g2ko::output::{FetchSummary, JsonOutput, write_report};

#[derive(Default)]
struct MockKegg {
    link_calls: Mutex<usize>,
    list_calls: Mutex<usize>,
}

impl KeggClient for MockKegg {
    fn link_ko(&self, organism: &OrganismCode) -> Result<String, G2koError> {
        *self.link_calls.lock().unwrap() += 1;
        match organism.as_str() {
            "eco" => Ok("eco:b0001\tko:K01234\neco:b0002\tko:K05678\n".to_string()),
            _ => Err(G2koError::KeggHttp("operation timed out".to_string())),
        }
    }

    fn list_ko(&self) -> Result<String, G2koError> {
        *self.list_calls.lock().unwrap() += 1;
        Ok("ko:K01234\thypothetical protein\n".to_string())
    }
}

fn eco() -> OrganismRequest {
    OrganismRequest::new("eco".parse().unwrap(), Some("E. coli"), 1)
}

#[test]
fn catalog_is_fetched_once_per_session() {
    let app = App::new(MockKegg::default());
    let options = FetchOptions {
        include_functions: true,
    };

    let first = app.fetch(&[eco()], options, &JsonOutput);
    let second = app.fetch(&[eco()], options, &JsonOutput);
    let catalog = app.catalog();

    assert_eq!(first.report, second.report);
    assert_eq!(catalog.lookup("K01234"), "hypothetical protein");
    assert_eq!(*app.client().list_calls.lock().unwrap(), 1);
    assert_eq!(*app.client().link_calls.lock().unwrap(), 2);
}

#[test]
fn catalog_not_loaded_without_functions() {
    let app = App::new(MockKegg::default());
    let result = app.fetch(
        &[eco()],
        FetchOptions {
            include_functions: false,
        },
        &JsonOutput,
    );

    assert_eq!(result.report, "# E. coli\nb0001\tK01234\nb0002\tK05678\n\n");
    assert_eq!(*app.client().list_calls.lock().unwrap(), 0);
}

#[test]
fn empty_request_list_touches_nothing() {
    let app = App::new(MockKegg::default());
    let result = app.fetch(&[], FetchOptions::default(), &JsonOutput);

    assert!(result.report.is_empty());
    assert!(!result.all_failed());
    assert_eq!(*app.client().list_calls.lock().unwrap(), 0);
    assert_eq!(*app.client().link_calls.lock().unwrap(), 0);
}

#[test]
fn summary_counts_and_errors() {
    let app = App::new(MockKegg::default());
    let hsa = OrganismRequest::new("hsa".parse().unwrap(), None, 2);
    let result = app.fetch(&[eco(), hsa], FetchOptions::default(), &JsonOutput);

    assert_eq!(result.requested, 2);
    assert_eq!(result.sections, 1);
    assert_eq!(result.records, 2);
    assert!(!result.all_failed());
    assert_eq!(result.errors[0].display_name, "Organism 2");

    let summary = FetchSummary::new(&result, None);
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["errors"][0]["code"], "hsa");
    assert_eq!(json["records"], 2);
}

#[test]
fn all_failed_when_no_section_fetched() {
    let app = App::new(MockKegg::default());
    let hsa = OrganismRequest::new("hsa".parse().unwrap(), None, 1);
    let result = app.fetch(&[hsa], FetchOptions::default(), &JsonOutput);

    assert!(result.all_failed());
    assert!(result.report.is_empty());
}

#[test]
fn report_written_to_nested_path() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("out").join("g2ko_output.txt")).unwrap();

    write_report(&path, "# E. coli\nb0001\tK01234\n\n").unwrap();
    write_report(&path, "# Human\n10\tK00622\n\n").unwrap();

    let content = std::fs::read_to_string(path.as_std_path()).unwrap();
    assert_eq!(content, "# Human\n10\tK00622\n\n");
}
