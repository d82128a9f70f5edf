use inquire::{InquireError, Text};
use nowcast_core::{AppState, Notification, Severity, View, WeatherApp, render_text, select_view};

/// One line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum PromptInput<'a> {
    Search(&'a str),
    Here,
    Quit,
}

fn parse_line(line: &str) -> PromptInput<'_> {
    match line.trim() {
        ":here" | ":h" => PromptInput::Here,
        ":quit" | ":q" => PromptInput::Quit,
        _ => PromptInput::Search(line),
    }
}

pub fn print_notifications(notes: &[Notification]) {
    for note in notes {
        let marker = match note.severity {
            Severity::Destructive => "✖",
            Severity::Normal => "•",
        };
        eprintln!("{marker} {}: {}", note.title, note.body);
    }
}

/// Re-render whenever the selected view or the controls change.
fn rendering_observer() -> Box<dyn FnMut(&AppState) + Send> {
    let mut last: Option<(View, bool)> = None;

    Box::new(move |state: &AppState| {
        let current = (select_view(state), state.locating_in_progress);
        if last.as_ref() != Some(&current) {
            println!("{}", render_text(state));
            last = Some(current);
        }
    })
}

pub async fn run(app: WeatherApp) -> anyhow::Result<()> {
    let mut app = app.with_observer(rendering_observer());

    app.mount().await;
    print_notifications(&app.take_notifications());

    loop {
        let line = match Text::new("City:")
            .with_placeholder("Enter city name...")
            .with_help_message(":here for your location, :quit to exit")
            .prompt()
        {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        match parse_line(&line) {
            PromptInput::Quit => break,
            PromptInput::Here => app.use_current_location().await,
            PromptInput::Search(text) => {
                app.set_input(text);
                app.submit_search().await;
            }
        }

        print_notifications(&app.take_notifications());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_recognised() {
        assert_eq!(parse_line(":here"), PromptInput::Here);
        assert_eq!(parse_line("  :q "), PromptInput::Quit);
        assert_eq!(parse_line(":quit"), PromptInput::Quit);
    }

    #[test]
    fn anything_else_is_a_raw_search() {
        assert_eq!(parse_line(" Paris "), PromptInput::Search(" Paris "));
        assert_eq!(parse_line(""), PromptInput::Search(""));
        assert_eq!(parse_line("here"), PromptInput::Search("here"));
    }
}
