use crate::db::models::AnalyticsEvent;

// Vertical layout, in point coordinates inherited from the canvas the
// report was originally drawn on. Rows step down the page and a new page
// begins once the cursor crosses the floor.
pub const PAGE_TOP_Y: i32 = 750;
pub const TABLE_TOP_Y: i32 = 680;
pub const ROW_STEP: i32 = 20;
pub const PAGE_FLOOR_Y: i32 = 50;

/// Messages are truncated to fit their column
pub const MESSAGE_WIDTH: usize = 30;

/// A rendered report document, one Vec of lines per page
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub pages: Vec<Vec<String>>,
}

impl RenderedReport {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total data rows across all pages (header lines excluded)
    pub fn row_count(&self) -> usize {
        let header_lines = 4;
        self.pages.iter().map(|p| p.len()).sum::<usize>() - header_lines
    }

    /// Flatten into document text, pages separated by form feeds
    pub fn into_text(self) -> String {
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push('\x0c');
            }
            for line in page {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

/// Render the record set into a paginated tabular document. The first
/// page carries the title block and column headers; continuation pages
/// carry rows only, starting back at the top margin.
pub fn render(
    events: &[AnalyticsEvent],
    start_date: &str,
    end_date: &str,
    generated_on: &str,
) -> RenderedReport {
    let mut pages = Vec::new();
    let mut page = vec![
        "Analytics Report".to_string(),
        format!("Date Range: {} to {}", start_date, end_date),
        format!("Generated On: {}", generated_on),
        format_row("ID", "User ID", "Message", "Date", "Camera Location", "Status"),
    ];

    let mut y = TABLE_TOP_Y - ROW_STEP;

    for event in events {
        if y < PAGE_FLOOR_Y {
            pages.push(std::mem::take(&mut page));
            y = PAGE_TOP_Y;
        }

        page.push(format_row(
            &event.analytics_id.to_string(),
            &event.user_id,
            &truncate(&event.message, MESSAGE_WIDTH),
            &event.create_date,
            &event.camera_location,
            &event.status,
        ));
        y -= ROW_STEP;
    }

    pages.push(page);

    RenderedReport { pages }
}

fn format_row(
    id: &str,
    user_id: &str,
    message: &str,
    date: &str,
    location: &str,
    status: &str,
) -> String {
    format!(
        "{:<8}{:<16}{:<32}{:<28}{:<18}{}",
        id, user_id, message, date, location, status
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events(count: usize) -> Vec<AnalyticsEvent> {
        (0..count)
            .map(|i| AnalyticsEvent {
                analytics_id: i as i64 + 1,
                user_id: "tester".to_string(),
                log_image: "uploads/images/a.jpg".to_string(),
                log_video: "uploads/videos/a.mp4".to_string(),
                create_date: format!("2025-01-01 00:00:{:02}.000000", i % 60),
                message: "Hardhat".to_string(),
                camera_id: "Camera3".to_string(),
                camera_location: "Location A".to_string(),
                action: "Default Action".to_string(),
                status: "Active".to_string(),
            })
            .collect()
    }

    #[test]
    fn empty_selection_renders_header_and_no_rows() {
        let report = render(&[], "2025-01-01", "2025-01-31", "2025-02-01 00:00:00");
        assert_eq!(report.page_count(), 1);
        assert_eq!(report.row_count(), 0);

        let text = report.into_text();
        assert!(text.contains("Analytics Report"));
        assert!(text.contains("Date Range: 2025-01-01 to 2025-01-31"));
    }

    // The first page fits 31 rows below the header block; the 32nd row
    // starts a new page at the top margin.
    #[test]
    fn first_page_holds_thirty_one_rows() {
        let report = render(
            &sample_events(31),
            "2025-01-01",
            "2025-01-31",
            "2025-02-01 00:00:00",
        );
        assert_eq!(report.page_count(), 1);

        let report = render(
            &sample_events(32),
            "2025-01-01",
            "2025-01-31",
            "2025-02-01 00:00:00",
        );
        assert_eq!(report.page_count(), 2);
        assert_eq!(report.pages[1].len(), 1);
    }

    #[test]
    fn continuation_pages_hold_thirty_six_rows() {
        // 31 + 36 rows exactly fill two pages
        let report = render(
            &sample_events(67),
            "2025-01-01",
            "2025-01-31",
            "2025-02-01 00:00:00",
        );
        assert_eq!(report.page_count(), 2);
        assert_eq!(report.row_count(), 67);

        let report = render(
            &sample_events(68),
            "2025-01-01",
            "2025-01-31",
            "2025-02-01 00:00:00",
        );
        assert_eq!(report.page_count(), 3);
    }

    #[test]
    fn long_messages_are_truncated_to_thirty_chars() {
        let mut events = sample_events(1);
        events[0].message = "A".repeat(48);

        let text = render(&events, "2025-01-01", "2025-01-31", "x").into_text();
        assert!(text.contains(&"A".repeat(30)));
        assert!(!text.contains(&"A".repeat(31)));
    }
}
