// tests/report_tests.rs
mod common;

use boxoffice::report::{
  MovieListing, OrderItemListing, PdfRenderer, ReportBuilder, ReportCell, ReportSpec, TicketSummary, NOT_AVAILABLE,
  TICKET_FILE_NAME,
};
use boxoffice::{Actor, BoxOfficeError, Cinema, ImageFetchError, FetchError, Order, OrderLine, Producer};
use chrono::Utc;
use common::*;
use serial_test::serial;

fn actors_with_ids(actors: Vec<Actor>) -> Vec<Actor> {
  actors
    .into_iter()
    .enumerate()
    .map(|(idx, mut a)| {
      a.id = idx as i64 + 1;
      a
    })
    .collect()
}

#[tokio::test]
#[serial]
async fn test_empty_record_set_yields_header_only() {
  setup_tracing();
  let fetcher = StubFetcher::default();
  let renderer = RecordingRenderer::default();

  let output = ReportBuilder::new(&fetcher, &renderer)
    .build::<Actor>(&ReportSpec::actors(), &[])
    .await
    .unwrap();

  assert_eq!(output.row_count, 0);
  assert!(output.diagnostics.is_empty());
  assert_eq!(output.file_name, "ActorsReport.pdf");
  assert_eq!(output.content_type, "application/pdf");

  let document = renderer.last();
  assert_eq!(document.title, "Actors Report");
  assert_eq!(document.headers, vec!["Profile Picture", "Full Name", "Bio"]);
  assert!(document.rows.is_empty());
}

#[tokio::test]
#[serial]
async fn test_unreachable_image_yields_one_diagnostic_for_that_row() {
  setup_tracing();
  let actors = actors_with_ids(vec![
    actor("First", "https://img.test/first.png"),
    actor("Second", "https://img.test/missing.png"),
    actor("Third", "https://img.test/third.png"),
  ]);
  let fetcher = StubFetcher::default()
    .with("https://img.test/first.png", b"first")
    .with("https://img.test/third.png", b"third");
  let renderer = RecordingRenderer::default();

  let output = ReportBuilder::new(&fetcher, &renderer)
    .build(&ReportSpec::actors(), &actors)
    .await
    .unwrap();

  assert_eq!(output.row_count, 3);
  assert_eq!(output.diagnostics.len(), 1);
  let diagnostic = &output.diagnostics[0];
  assert_eq!(diagnostic.row, 2);
  assert_eq!(diagnostic.record_id, actors[1].id);
  assert_eq!(diagnostic.column, "Profile Picture");
  assert_eq!(
    diagnostic.error,
    ImageFetchError::Fetch(FetchError::Status {
      url: "https://img.test/missing.png".to_string(),
      status: 404,
    })
  );

  let document = renderer.last();
  let names: Vec<_> = document.rows.iter().map(|r| r.cells[1].clone()).collect();
  assert_eq!(
    names,
    vec![
      ReportCell::Text("First".to_string()),
      ReportCell::Text("Second".to_string()),
      ReportCell::Text("Third".to_string()),
    ]
  );
  assert_eq!(document.rows[0].cells[0], ReportCell::Image(Some(b"first".to_vec())));
  assert_eq!(document.rows[1].cells[0], ReportCell::Image(None));

  // Fetches happen one row at a time, in record order.
  assert_eq!(
    *fetcher.requested.lock(),
    vec![
      "https://img.test/first.png",
      "https://img.test/missing.png",
      "https://img.test/third.png",
    ]
  );
}

#[tokio::test]
#[serial]
async fn test_blank_image_url_is_reported_without_fetching() {
  setup_tracing();
  let actors = actors_with_ids(vec![actor("NoPicture", "   ")]);
  let fetcher = StubFetcher::default();
  let renderer = RecordingRenderer::default();

  let output = ReportBuilder::new(&fetcher, &renderer)
    .build(&ReportSpec::actors(), &actors)
    .await
    .unwrap();

  assert_eq!(output.diagnostics.len(), 1);
  assert_eq!(output.diagnostics[0].error, ImageFetchError::MissingUrl);
  assert!(fetcher.requested.lock().is_empty());
}

#[tokio::test]
#[serial]
async fn test_missing_relations_render_not_available() {
  setup_tracing();
  let mut known = cinema("Grand");
  known.id = 1;
  let mut with_cinema = movie("Linked", "12.5");
  with_cinema.id = 1;
  with_cinema.producer_id = 42;
  let mut orphan = movie("Orphan", "8");
  orphan.id = 2;
  orphan.cinema_id = 99;
  orphan.producer_id = 99;

  let listings = MovieListing::join(vec![with_cinema, orphan], &[known], &Vec::<Producer>::new());
  let fetcher = StubFetcher::default();
  let renderer = RecordingRenderer::default();

  ReportBuilder::new(&fetcher, &renderer)
    .build(&ReportSpec::movies(), &listings)
    .await
    .unwrap();

  let document = renderer.last();
  let text = |row: usize, col: usize| match &document.rows[row].cells[col] {
    ReportCell::Text(t) => t.clone(),
    other => panic!("expected text cell, got {:?}", other),
  };
  assert_eq!(text(0, 2), "12.50");
  assert_eq!(text(0, 6), "Grand");
  assert_eq!(text(0, 7), NOT_AVAILABLE);
  assert_eq!(text(1, 6), NOT_AVAILABLE);
  assert_eq!(text(1, 7), NOT_AVAILABLE);
}

#[tokio::test]
#[serial]
async fn test_order_items_report_handles_orphan_lines() {
  setup_tracing();
  let mut known = movie("Known", "10");
  known.id = 5;
  let order = Order {
    id: 3,
    user_id: "u".to_string(),
    user_email: "u@example.com".to_string(),
    created_at: Utc::now(),
    lines: Vec::new(),
  };
  let lines = vec![
    OrderLine {
      id: 1,
      order_id: Some(3),
      movie_id: Some(5),
      quantity: 2,
      unit_price_at_purchase: dec("10"),
    },
    OrderLine {
      id: 2,
      order_id: Some(77),
      movie_id: None,
      quantity: 1,
      unit_price_at_purchase: dec("4.5"),
    },
  ];

  let listings = OrderItemListing::join(lines, &[known], &[order]);
  let fetcher = StubFetcher::default();
  let renderer = RecordingRenderer::default();
  ReportBuilder::new(&fetcher, &renderer)
    .build(&ReportSpec::order_items(), &listings)
    .await
    .unwrap();

  let document = renderer.last();
  assert_eq!(
    document.rows[0].cells,
    vec![
      ReportCell::Text("2".to_string()),
      ReportCell::Text("10.00".to_string()),
      ReportCell::Text("Known".to_string()),
      ReportCell::Text("3".to_string()),
    ]
  );
  assert_eq!(document.rows[1].cells[2], ReportCell::Text(NOT_AVAILABLE.to_string()));
  assert_eq!(document.rows[1].cells[3], ReportCell::Text(NOT_AVAILABLE.to_string()));
}

#[tokio::test]
#[serial]
async fn test_pdf_renderer_produces_pdf_bytes() {
  setup_tracing();
  let mut cinemas: Vec<Cinema> = (0..40).map(|i| cinema(&format!("Cinema{}", i))).collect();
  for (idx, c) in cinemas.iter_mut().enumerate() {
    c.id = idx as i64 + 1;
  }
  let fetcher = StubFetcher::default();
  let renderer = PdfRenderer::default();

  let output = ReportBuilder::new(&fetcher, &renderer)
    .build(&ReportSpec::cinemas(), &cinemas)
    .await
    .unwrap();

  assert!(output.bytes.starts_with(b"%PDF"));
  assert_eq!(output.row_count, 40);
  // Every logo 404s against the empty stub.
  assert_eq!(output.diagnostics.len(), 40);
  assert!(output.diagnostics.windows(2).all(|w| w[0].row < w[1].row));
}

#[tokio::test]
#[serial]
async fn test_undecodable_image_is_reported_by_renderer() {
  setup_tracing();
  let mut c = cinema("Broken");
  c.id = 9;
  let fetcher = StubFetcher::default().with(&c.logo, b"definitely not an image");
  let renderer = PdfRenderer::default();

  let output = ReportBuilder::new(&fetcher, &renderer)
    .build(&ReportSpec::cinemas(), &[c])
    .await
    .unwrap();

  assert!(output.bytes.starts_with(b"%PDF"));
  assert_eq!(output.diagnostics.len(), 1);
  assert_eq!(output.diagnostics[0].row, 1);
  assert_eq!(output.diagnostics[0].record_id, 9);
  assert_eq!(output.diagnostics[0].column, "Logo");
  assert!(matches!(output.diagnostics[0].error, ImageFetchError::Undecodable(_)));
}

#[test]
fn test_ticket_summary_from_order() {
  let mut a = movie("Alpha", "10");
  a.id = 1;
  let mut b = movie("Beta", "15");
  b.id = 2;
  let order = Order {
    id: 12,
    user_id: "u-1".to_string(),
    user_email: "fan@example.com".to_string(),
    created_at: Utc::now(),
    lines: vec![
      OrderLine {
        id: 1,
        order_id: Some(12),
        movie_id: Some(1),
        quantity: 2,
        unit_price_at_purchase: dec("10"),
      },
      OrderLine {
        id: 2,
        order_id: Some(12),
        movie_id: Some(2),
        quantity: 1,
        unit_price_at_purchase: dec("15"),
      },
    ],
  };

  let summary = TicketSummary::from_order(&order, &order.user_email, &[a, b]);

  assert_eq!(summary.movie_names, "Alpha, Beta");
  assert_eq!(summary.ticket_price.as_deref(), Some("10.00"));
  assert_eq!(summary.number_of_tickets, 3);
  assert_eq!(summary.total, "35.00");

  let document = summary.document();
  assert_eq!(document.title, "Movie Ticket");
  assert!(document.headers.is_empty());
  assert_eq!(document.rows.len(), 5);

  let output = summary.render(&PdfRenderer::default()).unwrap();
  assert_eq!(output.file_name, TICKET_FILE_NAME);
  assert!(output.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
#[serial]
async fn test_document_init_failure_aborts_build_despite_row_diagnostics() {
  setup_tracing();
  let actors = actors_with_ids(vec![
    actor("Reachable", "https://img.test/ok.png"),
    actor("Unreachable", "https://img.test/missing.png"),
  ]);
  let fetcher = StubFetcher::default().with("https://img.test/ok.png", b"bytes");

  let result = ReportBuilder::new(&fetcher, &FailingRenderer)
    .build(&ReportSpec::actors(), &actors)
    .await;

  match result {
    Err(BoxOfficeError::DocumentInit { report, message }) => {
      assert_eq!(report, "Actors Report");
      assert_eq!(message, "font table unavailable");
    }
    other => panic!("expected DocumentInit, got {:?}", other.map(|o| o.row_count)),
  }
  // Rows were still fetched before the renderer gave up.
  assert_eq!(fetcher.requested.lock().len(), 2);
}
