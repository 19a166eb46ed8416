use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Runtime options accepted by the `main` and `test` attributes.
#[derive(Default)]
pub(crate) struct RuntimeArgs {
    /// Whether the runtime clock starts paused.
    pub(crate) start_paused: bool,
}

impl RuntimeArgs {
    /// Parses `key = value` pairs separated by commas.
    ///
    /// A bare `start_paused` is accepted as `start_paused = true`.
    /// Unknown keys produce an error message suitable for `compile_error!`.
    pub(crate) fn parse(attr: TokenStream) -> Result<Self, String> {
        let mut args = Self::default();
        let attr = attr.to_string();

        for part in attr.split(',') {
            let part = part.trim();

            if part.is_empty() {
                continue;
            }

            let (key, value) = match part.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (part, "true"),
            };

            match key {
                "start_paused" => {
                    args.start_paused = value
                        .parse::<bool>()
                        .map_err(|_| format!("start_paused expects a bool, got `{value}`"))?;
                }
                other => return Err(format!("unknown runtime option `{other}`")),
            }
        }

        Ok(args)
    }

    /// Renders the `RuntimeBuilder` expression for these options.
    pub(crate) fn builder(&self) -> String {
        let mut builder = String::from("::sequentis::RuntimeBuilder::new()");

        if self.start_paused {
            builder.push_str(".start_paused(true)");
        }

        builder.push_str(".build()");
        builder
    }
}

/// Removes the `async` keyword from a function signature.
pub(crate) fn strip_async(tokens: &mut Vec<TokenTree>) -> bool {
    let Some(pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    else {
        return false;
    };

    tokens.remove(pos);
    true
}

/// Replaces the function body with `body(block)`.
///
/// The body is the last brace-delimited group of the item. Returns `false`
/// if the item has no body.
pub(crate) fn replace_body(tokens: &mut [TokenTree], body: impl FnOnce(String) -> String) -> bool {
    let Some(pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return false;
    };

    let block = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    let Ok(stream) = body(block).parse::<TokenStream>() else {
        return false;
    };

    tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, stream));
    true
}

/// Builds a `compile_error!` invocation carrying `msg`.
pub(crate) fn compile_error(msg: &str) -> TokenStream {
    format!("compile_error!({msg:?});")
        .parse()
        .unwrap_or_default()
}
