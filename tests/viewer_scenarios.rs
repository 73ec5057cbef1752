#[cfg(test)]
mod tests {
    use csv_pager::data::column::{display_width, ColumnKind};
    use csv_pager::data::column_store::ColumnStore;
    use csv_pager::data::error::{ReadError, StoreError};
    use csv_pager::data::record_source::{CsvOptions, CsvRecordSource};
    use csv_pager::ui::actions::{Action, NavigateAction, SortDirection};
    use csv_pager::ui::canvas::{BufferCanvas, Palette};
    use csv_pager::ui::session::{handle_action, SessionState};
    use csv_pager::ui::table_renderer::render_table;
    use csv_pager::ui::viewport::{effective_width, SEPARATOR_WIDTH};
    use std::io::Cursor;

    type Store = ColumnStore<CsvRecordSource<Cursor<String>>>;

    fn csv_store(text: &str, header_present: bool) -> Store {
        let source = CsvRecordSource::new(Cursor::new(text.to_string()), CsvOptions::default());
        ColumnStore::initialize(source, header_present).unwrap()
    }

    fn session(store: &mut Store, width: u16, height: u16) -> SessionState {
        let mut state = SessionState::new(width, height, true);
        state.refresh(store).unwrap();
        state
    }

    fn render(state: &SessionState, store: &Store) -> BufferCanvas {
        let (width, height) = state.screen_size();
        let mut canvas = BufferCanvas::new(width, height, Palette::default());
        render_table(&mut canvas, state, store, '|').unwrap();
        canvas
    }

    fn act(state: &mut SessionState, store: &mut Store, action: Action) {
        handle_action(state, store, action).unwrap();
    }

    #[test]
    fn test_sort_descending_scenario() {
        let mut store = csv_store("a,b\n1,2\n3,4\n", true);
        let mut state = session(&mut store, 80, 10);

        assert!(state.visible().contains(0));
        assert!(state.visible().contains(1));
        assert_eq!((state.cursor_column, state.cursor_row), (0, 0));

        act(&mut state, &mut store, Action::FeedAll);
        act(&mut state, &mut store, Action::Navigate(NavigateAction::Right(1)));
        act(&mut state, &mut store, Action::Sort(SortDirection::Descending));

        assert_eq!(state.display_row(0), 1);
        assert_eq!(state.display_row(1), 0);

        let canvas = render(&state, &store);
        assert_eq!(canvas.line(0), "a|b");
        assert_eq!(canvas.line(1), "3|4");
        assert_eq!(canvas.line(2), "1|2");
        assert_eq!(canvas.line(9), "row 1/2  sorted by b desc  col 2/2 b [text]");
    }

    #[test]
    fn test_hidden_column_collapses_and_shifts_neighbour() {
        let mut store = csv_store("alpha,b\nxyz,2\n", true);
        let mut state = session(&mut store, 40, 5);
        assert_eq!(state.visible().offset(1), Some(6));

        act(&mut state, &mut store, Action::ToggleColumnVisibility);
        assert_eq!(state.visible().offset(1), Some(2));

        let canvas = render(&state, &store);
        assert_eq!(canvas.line(0), "a|b");
        assert_eq!(canvas.line(1), "x|2");
    }

    #[test]
    fn test_failed_conversion_leaves_values() {
        let mut store = csv_store("n\n1\nx\n", true);
        let mut state = session(&mut store, 40, 6);

        act(&mut state, &mut store, Action::ConvertColumnToInteger);

        let column = store.column(0).unwrap();
        assert_eq!(column.kind(), ColumnKind::Text);
        assert_eq!(column.render(0).unwrap(), "1");
        assert_eq!(column.render(1).unwrap(), "x");
        assert_eq!(
            state.status_message.as_deref(),
            Some("cannot convert 'n' to integer: row 1 value 'x'")
        );
    }

    #[test]
    fn test_integer_sort_is_numeric() {
        let mut store = csv_store("n\n10\n9\n100\n", true);
        let mut state = session(&mut store, 40, 6);

        act(&mut state, &mut store, Action::Sort(SortDirection::Ascending));
        let text_order: Vec<usize> = (0..3).map(|i| state.display_row(i)).collect();
        assert_eq!(text_order, vec![0, 2, 1]);

        act(&mut state, &mut store, Action::ConvertColumnToInteger);
        act(&mut state, &mut store, Action::Sort(SortDirection::Ascending));
        let numeric_order: Vec<usize> = (0..3).map(|i| state.display_row(i)).collect();
        assert_eq!(numeric_order, vec![1, 0, 2]);
    }

    #[test]
    fn test_width_monotonic_and_rows_uniform_across_feeds() {
        let mut text = String::from("id,name,note\n");
        for i in 0..50 {
            text.push_str(&format!("{},{},{}\n", i, "n".repeat(i % 7), " ".repeat(i % 3)));
        }
        let mut store = csv_store(&text, true);

        let mut previous: Vec<usize> = store.columns().iter().map(|c| c.width()).collect();
        loop {
            let read = store.feed_rows(7).unwrap();
            let rows = store.row_count();
            for (i, column) in store.columns().iter().enumerate() {
                assert_eq!(column.len(), rows);
                assert!(column.width() >= previous[i]);
                assert!(column.width() >= display_width(column.header()));
                for row in 0..rows {
                    let value = column.render(row).unwrap();
                    assert!(column.width() >= display_width(&value));
                    assert!(!value.is_empty());
                }
                previous[i] = column.width();
            }
            if read < 7 {
                break;
            }
        }
        assert_eq!(store.row_count(), 50);
    }

    #[test]
    fn test_feed_all_is_idempotent() {
        let mut store = csv_store("a\n1\n2\n3\n", true);
        assert_eq!(store.feed_all().unwrap(), 3);
        assert_eq!(store.feed_all().unwrap(), 0);
        assert_eq!(store.row_count(), 3);
        assert!(store.is_exhausted());
    }

    #[test]
    fn test_viewport_contains_cursor_after_every_move() {
        let widths = [4usize, 12, 3, 9, 15, 1, 7, 20, 2, 6];
        let header: Vec<String> = (0..widths.len()).map(|i| format!("c{}", i)).collect();
        let row: Vec<String> = widths.iter().map(|&w| "x".repeat(w)).collect();
        let text = format!("{}\n{}\n", header.join(","), row.join(","));
        let mut store = csv_store(&text, true);
        let width = 30;
        let mut state = session(&mut store, width, 6);

        let moves = std::iter::repeat(NavigateAction::Right(1))
            .take(12)
            .chain(std::iter::repeat(NavigateAction::Left(1)).take(12))
            .chain([NavigateAction::PageRight, NavigateAction::PageRight, NavigateAction::PageLeft]);

        for nav in moves {
            act(&mut state, &mut store, Action::Navigate(nav));
            let visible = state.visible();
            assert!(visible.begin() <= state.cursor_column);
            assert!(state.cursor_column < visible.end());

            // maximal: the next column would start at or past the edge
            if visible.end() < store.column_count() {
                let last = visible.end() - 1;
                let next_offset = visible.offset(last).unwrap()
                    + effective_width(store.column(last).unwrap())
                    + SEPARATOR_WIDTH;
                assert!(next_offset >= width as usize);
            }
        }
    }

    #[test]
    fn test_headerless_input_keeps_first_record() {
        let mut store = csv_store("1,2\n3,4\n", false);
        let mut state = SessionState::new(20, 5, false);
        state.refresh(&mut store).unwrap();
        assert_eq!(store.row_count(), 2);
        assert_eq!(store.column(0).unwrap().header(), " ");

        let canvas = render(&state, &store);
        assert_eq!(canvas.line(0), "1|2");
        assert_eq!(canvas.line(1), "3|4");
    }

    #[test]
    fn test_ragged_record_is_fatal() {
        let mut store = csv_store("a,b\n1,2\n3\n", true);
        let err = store.feed_all().unwrap_err();
        assert!(matches!(err, StoreError::Read(ReadError::Csv(_))), "{:?}", err);
        assert_eq!(store.row_count(), 1);
    }

    #[test]
    fn test_empty_input_fails_to_initialize() {
        let source = CsvRecordSource::new(Cursor::new(String::new()), CsvOptions::default());
        let result = ColumnStore::initialize(source, true);
        assert!(matches!(result, Err(StoreError::EmptyInput)));
    }

    #[test]
    fn test_tab_delimited_with_padding() {
        let options = CsvOptions {
            delimiter: b'\t',
            ..CsvOptions::default()
        };
        let source = CsvRecordSource::new(Cursor::new("k\tv\n  a\t\n".to_string()), options);
        let mut store = ColumnStore::initialize(source, true).unwrap();
        store.feed_all().unwrap();
        assert_eq!(store.column(0).unwrap().render(0).unwrap(), "a");
        assert_eq!(store.column(1).unwrap().render(0).unwrap(), " ");
    }
}
