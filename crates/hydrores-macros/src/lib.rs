use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, Lit, LitInt, LitStr, Meta};

/// Derive macro that declares a per-step record as a stable column schema.
/// All fields in the source struct must be `f64`.
///
/// Generates a companion `*Timeseries` struct with the same fields as
/// `Vec<f64>`, along with `with_capacity`, `push`, `get`, `len`, and
/// `is_empty` methods. On the source struct it adds `field_names()`,
/// `headers()`, `values()` and `presented()`.
///
/// Field attributes:
/// - `#[column(header = "Q [m3/s]")]` sets the table header (defaults to the
///   field name).
/// - `#[column(decimals = 1)]` rounds the value to that many decimals in
///   `presented()`. Fields without `decimals` are presented unrounded.
///
/// Use `#[fluxes(timeseries_name = "CustomName")]` to override the default
/// timeseries struct name (`{StructName}Timeseries`).
#[proc_macro_derive(Fluxes, attributes(fluxes, column))]
pub fn derive_fluxes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let ts_name = extract_timeseries_name(&input)
        .unwrap_or_else(|| format_ident!("{}Timeseries", name));

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "Fluxes can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "Fluxes can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    if fields.is_empty() {
        return syn::Error::new_spanned(name, "Fluxes struct must have at least one field")
            .to_compile_error()
            .into();
    }

    let mut field_names = Vec::new();
    let mut headers = Vec::new();
    let mut field_idents = Vec::new();
    let mut presented = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        if !is_f64_type(&field.ty) {
            return syn::Error::new_spanned(&field.ty, "Fluxes derive: all fields must be f64")
                .to_compile_error()
                .into();
        }
        let column = match parse_column_attr(field) {
            Ok(c) => c,
            Err(e) => return e.to_compile_error().into(),
        };

        presented.push(match column.decimals {
            Some(d) => quote! {
                {
                    let scale = 10f64.powi(#d);
                    (self.#ident * scale).round() / scale
                }
            },
            None => quote! { self.#ident },
        });
        field_names.push(ident.to_string());
        headers.push(column.header.unwrap_or_else(|| ident.to_string()));
        field_idents.push(ident);
    }

    let first_field = &field_idents[0];
    let n_columns = field_idents.len();

    let field_name_strs: Vec<&str> = field_names.iter().map(|s| s.as_str()).collect();
    let header_strs: Vec<&str> = headers.iter().map(|s| s.as_str()).collect();

    let ts_fields = field_idents.iter().map(|f| {
        quote! { pub #f: Vec<f64> }
    });

    let with_cap_fields = field_idents.iter().map(|f| {
        quote! { #f: Vec::with_capacity(n) }
    });

    let push_fields = field_idents.iter().map(|f| {
        quote! { self.#f.push(f.#f); }
    });

    let get_fields = field_idents.iter().map(|f| {
        quote! { #f: self.#f[i] }
    });

    let value_fields = field_idents.iter().map(|f| {
        quote! { self.#f }
    });

    let expanded = quote! {
        /// Auto-generated timeseries struct for collecting per-timestep values.
        #[derive(Debug, Clone, Default)]
        pub struct #ts_name {
            #(#ts_fields,)*
        }

        impl #ts_name {
            /// Pre-allocate all vectors for `n` timesteps.
            pub fn with_capacity(n: usize) -> Self {
                Self {
                    #(#with_cap_fields,)*
                }
            }

            /// Push a single timestep's values.
            pub fn push(&mut self, f: &#name) {
                #(#push_fields)*
            }

            /// Reassemble the record stored at timestep `i`.
            pub fn get(&self, i: usize) -> Option<#name> {
                if i >= self.len() {
                    return None;
                }
                Some(#name {
                    #(#get_fields,)*
                })
            }

            /// Number of timesteps stored.
            pub fn len(&self) -> usize {
                self.#first_field.len()
            }

            /// Returns `true` if no timesteps have been stored.
            pub fn is_empty(&self) -> bool {
                self.#first_field.is_empty()
            }
        }

        impl #name {
            /// Number of declared columns.
            pub const N_COLUMNS: usize = #n_columns;

            /// Returns the field names of this record, in declaration order.
            pub fn field_names() -> &'static [&'static str] {
                &[#(#field_name_strs),*]
            }

            /// Returns the table headers of this record, in declaration order.
            pub fn headers() -> &'static [&'static str] {
                &[#(#header_strs),*]
            }

            /// Full-precision values in column order.
            pub fn values(&self) -> [f64; #n_columns] {
                [#(#value_fields),*]
            }

            /// Values in column order, rounded per column for presentation.
            pub fn presented(&self) -> [f64; #n_columns] {
                [#(#presented),*]
            }
        }
    };

    expanded.into()
}

struct ColumnAttr {
    header: Option<String>,
    decimals: Option<i32>,
}

fn parse_column_attr(field: &Field) -> syn::Result<ColumnAttr> {
    let mut column = ColumnAttr {
        header: None,
        decimals: None,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("column") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("header") {
                let lit: LitStr = meta.value()?.parse()?;
                column.header = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("decimals") {
                let lit: LitInt = meta.value()?.parse()?;
                column.decimals = Some(lit.base10_parse::<i32>()?);
                Ok(())
            } else {
                Err(meta.error("expected `header` or `decimals`"))
            }
        })?;
    }
    Ok(column)
}

fn extract_timeseries_name(input: &DeriveInput) -> Option<proc_macro2::Ident> {
    for attr in &input.attrs {
        if attr.path().is_ident("fluxes") {
            let nested = attr
                .parse_args_with(
                    syn::punctuated::Punctuated::<syn::Meta, syn::Token![,]>::parse_terminated,
                )
                .ok()?;
            for meta in nested {
                if let Meta::NameValue(nv) = meta {
                    if nv.path.is_ident("timeseries_name") {
                        if let syn::Expr::Lit(expr_lit) = &nv.value {
                            if let Lit::Str(lit_str) = &expr_lit.lit {
                                return Some(format_ident!("{}", lit_str.value()));
                            }
                        }
                    }
                }
            }
        }
    }
    None
}

fn is_f64_type(ty: &syn::Type) -> bool {
    if let syn::Type::Path(type_path) = ty {
        type_path.path.is_ident("f64")
    } else {
        false
    }
}
