use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    parse_macro_input, spanned::Spanned, Attribute, Data, DeriveInput, Error, Field, Fields, Ident,
    LitStr, Meta, Path, Result,
};

pub fn style_context_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_style_context(input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// Fields of the component struct, sorted by role.
#[cfg_attr(feature = "parse-debug", derive(Debug))]
struct ContextFields<'a> {
    root: &'a Ident,
    targets: Vec<(String, &'a Ident)>,
    clock: Option<&'a Ident>,
    animations: Option<&'a Ident>,
}

fn expand_style_context(input: DeriveInput) -> Result<TokenStream2> {
    let DeriveInput {
        ident: name,
        data,
        generics,
        attrs,
        ..
    } = input;
    let Data::Struct(struct_data) = data else {
        return Err(Error::new(
            Span::call_site(),
            "derive(StyleContext) requires a struct type.",
        ));
    };
    let Fields::Named(fields) = struct_data.fields else {
        return Err(Error::new(
            struct_data.fields.span(),
            "derive(StyleContext) requires a struct with named fields.",
        ));
    };

    let component = component_name(&attrs)?.unwrap_or_else(|| name.to_string());
    let context_fields = collect_fields(fields.named.iter())?;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let root = context_fields.root;
    let target_arms = context_fields.targets.iter().map(|(target, field)| {
        quote! {
            #target => ::std::option::Option::Some(::kinetic::Styleable::style(&self.#field)),
        }
    });
    let clock_fn = context_fields.clock.map(|field| {
        quote! {
            fn clock(&self) -> ::kinetic::FrameClock {
                ::std::clone::Clone::clone(&self.#field)
            }
        }
    });
    let animated_impl = context_fields.animations.map(|field| {
        quote! {
            impl #impl_generics ::kinetic::Animated for #name #ty_generics #where_clause {
                fn animation_set(&self) -> &::kinetic::AnimationSet {
                    &self.#field
                }
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::kinetic::StyleContext for #name #ty_generics #where_clause {
            fn component_name(&self) -> &str {
                #component
            }

            fn root_style(&self) -> ::kinetic::SharedStyle {
                ::kinetic::Styleable::style(&self.#root)
            }

            fn target_style(&self, name: &str) -> ::std::option::Option<::kinetic::SharedStyle> {
                match name {
                    #(#target_arms)*
                    _ => ::std::option::Option::None,
                }
            }

            #clock_fn
        }

        #animated_impl
    })
}

fn collect_fields<'a>(fields: impl Iterator<Item = &'a Field>) -> Result<ContextFields<'a>> {
    let mut root = None;
    let mut targets: Vec<(String, &Ident)> = Vec::new();
    let mut clock = None;
    let mut animations = None;
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(Error::new(field.span(), "expected a named field."));
        };
        for attr in &field.attrs {
            let path = attr.path();
            if is_simple_path(path, "root") {
                require_bare(attr, "root")?;
                set_once(&mut root, ident, attr, "root")?;
            } else if is_simple_path(path, "clock") {
                require_bare(attr, "clock")?;
                set_once(&mut clock, ident, attr, "clock")?;
            } else if is_simple_path(path, "animations") {
                require_bare(attr, "animations")?;
                set_once(&mut animations, ident, attr, "animations")?;
            } else if is_simple_path(path, "target") {
                let target = target_name(attr, ident)?;
                if targets.iter().any(|(existing, _)| *existing == target) {
                    return Err(Error::new(
                        attr.span(),
                        format!("duplicate animation target `{target}`."),
                    ));
                }
                targets.push((target, ident));
            }
        }
    }
    let Some(root) = root else {
        return Err(Error::new(
            Span::call_site(),
            "derive(StyleContext) requires exactly one field marked #[root].",
        ));
    };
    Ok(ContextFields {
        root,
        targets,
        clock,
        animations,
    })
}

fn set_once<'a>(
    slot: &mut Option<&'a Ident>,
    ident: &'a Ident,
    attr: &Attribute,
    name: &str,
) -> Result<()> {
    if slot.is_some() {
        return Err(Error::new(
            attr.span(),
            format!("only one field may be marked #[{name}]."),
        ));
    }
    *slot = Some(ident);
    Ok(())
}

fn require_bare(attr: &Attribute, name: &str) -> Result<()> {
    match attr.meta {
        Meta::Path(_) => Ok(()),
        _ => Err(Error::new(
            attr.span(),
            format!("#[{name}] does not take arguments."),
        )),
    }
}

/// Name under which a `#[target]` field is looked up: the field name, or the `name` given as
/// `#[target(name = "...")]`.
fn target_name(attr: &Attribute, ident: &Ident) -> Result<String> {
    match &attr.meta {
        Meta::Path(_) => Ok(ident.to_string()),
        Meta::List(_) => {
            let mut name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    name = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported #[target] option; expected `name`."))
                }
            })?;
            Ok(name.unwrap_or_else(|| ident.to_string()))
        }
        Meta::NameValue(_) => Err(Error::new(
            attr.span(),
            "expected #[target] or #[target(name = \"...\")].",
        )),
    }
}

/// Reads `#[style_context(component = "...")]`, which overrides the component name.
fn component_name(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut component = None;
    for attr in attrs
        .iter()
        .filter(|attr| is_simple_path(attr.path(), "style_context"))
    {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("component") {
                let value: LitStr = meta.value()?.parse()?;
                component = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported #[style_context] option; expected `component`."))
            }
        })?;
    }
    Ok(component)
}

fn is_simple_path<'a>(path: &Path, name: impl Into<&'a str>) -> bool {
    path.segments.len() == 1
        && path.segments[0].arguments.is_none()
        && path.segments[0].ident == name.into()
}
