use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Error, Expr, Ident, LitInt, Token};

/// Arguments accepted by `#[strand::main(...)]` and `#[strand::test(...)]`.
///
/// ```text
/// #[strand::main(worker_threads = 4)]
/// ```
#[derive(Default)]
pub(crate) struct RuntimeArgs {
    /// Size of the worker pool; the builder default when absent.
    pub(crate) worker_threads: Option<LitInt>,
}

impl Parse for RuntimeArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = RuntimeArgs::default();

        let pairs = Punctuated::<Arg, Token![,]>::parse_terminated(input)?;
        for arg in pairs {
            match arg.name.to_string().as_str() {
                "worker_threads" => {
                    if args.worker_threads.is_some() {
                        return Err(Error::new_spanned(&arg.name, "duplicate `worker_threads`"));
                    }
                    args.worker_threads = Some(worker_threads(arg.value)?);
                }
                other => {
                    return Err(Error::new_spanned(
                        &arg.name,
                        format!("unknown argument `{other}`, expected `worker_threads`"),
                    ));
                }
            }
        }

        Ok(args)
    }
}

/// One `name = value` pair.
struct Arg {
    name: Ident,
    value: Expr,
}

impl Parse for Arg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = input.parse()?;
        input.parse::<Token![=]>()?;
        let value = input.parse()?;

        Ok(Self { name, value })
    }
}

fn worker_threads(value: Expr) -> syn::Result<LitInt> {
    let lit = match value {
        Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Int(lit),
            ..
        }) => lit,
        other => {
            return Err(Error::new_spanned(
                other,
                "`worker_threads` must be an integer literal",
            ));
        }
    };

    if lit.base10_parse::<usize>()? == 0 {
        return Err(Error::new_spanned(lit, "`worker_threads` must be > 0"));
    }

    Ok(lit)
}
