use darling::{ast, FromDeriveInput, FromField};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::{parse_macro_input, spanned::Spanned, DeriveInput, Type};

#[derive(FromDeriveInput)]
#[darling(supports(struct_named))]
struct InjectableInput {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<(), InjectField>,
}

#[derive(FromField)]
#[darling(attributes(inject))]
struct InjectField {
    ident: Option<syn::Ident>,
    ty: Type,
    #[darling(default)]
    name: Option<String>,
}

pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let parsed = match InjectableInput::from_derive_input(&input) {
        Ok(parsed) => parsed,
        Err(err) => return err.write_errors().into(),
    };
    TokenStream::from(generate_injectable_impl(&parsed))
}

fn generate_injectable_impl(input: &InjectableInput) -> TokenStream2 {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        ast::Data::Struct(fields) => &fields.fields,
        ast::Data::Enum(_) => unreachable!("darling only accepts named structs here"),
    };

    let field_injections = fields.iter().map(generate_field_injection);

    quote! {
        impl #impl_generics ::actionkit::Injectable for #struct_name #ty_generics #where_clause {
            fn inject(
                services: &::actionkit::Services
            ) -> ::actionkit::Result<Self> {
                Ok(Self {
                    #(#field_injections),*
                })
            }
        }
    }
}

fn generate_field_injection(field: &InjectField) -> TokenStream2 {
    let field_name = &field.ident;

    if is_services(&field.ty) {
        return quote! { #field_name: ::std::clone::Clone::clone(services) };
    }

    let Some(inner) = arc_inner_type(&field.ty) else {
        return quote_spanned! {field.ty.span()=>
            #field_name: compile_error!(
                "#[derive(Injectable)] fields must be Arc<T>, Arc<dyn Trait> or Services"
            )
        };
    };

    match (&field.name, inner) {
        (Some(name), _) => quote! {
            #field_name: services.resolve_named::<#inner>(#name)?
        },
        (None, Type::TraitObject(_)) => quote! {
            #field_name: services.resolve_trait::<#inner>()?
        },
        (None, _) => quote! {
            #field_name: services.resolve::<#inner>()?
        },
    }
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path.path.segments.last(),
        _ => None,
    }
}

fn is_services(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|segment| segment.ident == "Services")
}

/// The `T` of `Arc<T>` (or `Arc<dyn Trait>`).
fn arc_inner_type(ty: &Type) -> Option<&Type> {
    let segment = last_segment(ty)?;
    if segment.ident != "Arc" {
        return None;
    }
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => match args.args.first()? {
            syn::GenericArgument::Type(inner) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}
