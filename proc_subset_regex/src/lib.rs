use proc_macro2::TokenStream;
use quote::{format_ident, quote, ToTokens};
use subset_regex_transformer::{compile, Dfa};
use syn::{parse_macro_input, LitStr};

/// Compiles a pattern to a DFA while expanding and emits a `const fn`
/// matcher for it.
///
/// ```ignore
/// const fn is_ab(s: &str) -> bool {
///     regex!("(a|b)*c").test(s)
/// }
/// ```
///
/// Invalid patterns are reported as compile errors on the literal.
#[proc_macro]
pub fn regex(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let literal = parse_macro_input!(input as LitStr);

    let dfa = match compile(&literal.value()) {
        Ok(dfa) => dfa,
        Err(e) => {
            return syn::Error::new(literal.span(), format!("invalid pattern: {e}"))
                .to_compile_error()
                .into();
        }
    };

    let fnl = Final::from(&dfa);
    let x = quote! { #fnl };

    x.into()
}

struct Final {
    start: usize,
    accepting: Vec<usize>,
    functions: Functions,
}

impl From<&Dfa> for Final {
    fn from(dfa: &Dfa) -> Self {
        let functions = dfa
            .transitions()
            .iter()
            .enumerate()
            .map(|(id, t)| GenFunc {
                id,
                transitions: t.iter().map(|(c, ns)| (*c as u32, ns.index())).collect(),
            })
            .collect();

        Final {
            start: dfa.start().index(),
            accepting: dfa.accepting().iter().map(|s| s.index()).collect(),
            functions: Functions { functions },
        }
    }
}

impl ToTokens for Final {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let start = self.start;
        let functions_ts = self.functions.to_token_stream();

        let dispatch = self.functions.functions.iter().map(|f| {
            let id = f.id;
            let function_ident = f.ident();
            quote! { #id => Self::#function_ident(c), }
        });

        let accepting = &self.accepting;
        let accepted = if accepting.is_empty() {
            quote! { false }
        }
        else {
            quote! { matches!(state, #(#accepting)|*) }
        };

        tokens.extend(quote! {
                {
                    struct Regex;
                    impl Regex {
                        const DEAD: usize = usize::MAX;

                        #functions_ts

                        pub const fn test(&self, s: &str) -> bool {
                            let mut remaining = ::subset_regex_util::CharSlice::new(s);
                            let mut state: usize = #start;
                            while !remaining.is_empty() {
                                let (c, rest) = remaining.get_advance();
                                state = match state {
                                    #(#dispatch)*
                                    _ => Self::DEAD,
                                };
                                if state == Self::DEAD {
                                    return false;
                                }
                                remaining = rest;
                            }
                            #accepted
                        }
                    }
                    Regex {}
                }
        });
    }
}

struct Functions {
    functions: Vec<GenFunc>,
}

impl ToTokens for Functions {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        for f in &self.functions {
            f.to_tokens(tokens);
        }
    }
}

/// Step function for one DFA state: maps a scalar value to the next state.
struct GenFunc {
    id: usize,
    transitions: Vec<(u32, usize)>,
}

impl GenFunc {
    fn ident(&self) -> syn::Ident {
        format_ident!("_{}", self.id)
    }
}

impl ToTokens for GenFunc {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let function_ident = self.ident();
        let (symbols, next): (Vec<_>, Vec<_>) = self.transitions.iter().copied().unzip();

        tokens.extend(quote! {
            const fn #function_ident(c: u32) -> usize {
                match c {
                    #(#symbols => #next,)*
                    _ => Self::DEAD,
                }
            }
        });
    }
}
