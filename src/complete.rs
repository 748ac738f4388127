/// Completion candidates for the word at the end of `line`.
///
/// Returns the byte offset where that word starts, which is where the
/// candidates replace the line. A word without `/` completes against
/// application names; anything else completes against the file system via
/// `word*`.
pub fn candidates(line: &str, names: &[String]) -> (usize, Vec<String>) {
    let (start, word) = current_word(line);
    if !word.contains('/') {
        let matches = names
            .iter()
            .filter(|name| name.starts_with(word.as_str()))
            .cloned()
            .collect();
        return (start, matches);
    }
    let Ok(paths) = glob::glob(&format!("{}*", glob::Pattern::escape(&word))) else {
        return (start, Vec::new());
    };
    let mut matches: Vec<String> = paths
        .filter_map(Result::ok)
        .map(|path| {
            let mut text = path.display().to_string();
            if path.is_dir() {
                text.push('/');
            }
            text
        })
        .collect();
    matches.sort();
    (start, matches)
}

/// The word being typed and the byte offset of its first character,
/// opening quote included. Empty after trailing whitespace.
pub fn current_word(line: &str) -> (usize, String) {
    let start = word_start(line);
    let raw = &line[start..];
    let word = shlex::split(raw)
        .and_then(|words| words.into_iter().next())
        .unwrap_or_else(|| raw.trim_start_matches(['"', '\'']).to_string());
    (start, word)
}

/// Offset just past the last whitespace outside quotes.
fn word_start(line: &str) -> usize {
    let mut start = 0;
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, c) if c.is_whitespace() => start = i + c.len_utf8(),
            (None, _) => {}
        }
    }
    start
}
