use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, ToTokens};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::token::Comma;
use syn::visit_mut::{self, VisitMut};
use syn::{
    AngleBracketedGenericArguments, Attribute, Error as SynError, FnArg, GenericArgument, Ident,
    ImplItem, ImplItemFn, ItemImpl, PathArguments, Result as SynResult, ReturnType, Signature,
    Type, TypePath,
};

use crate::attrs::AttributeData;

#[derive(Debug)]
struct ConstructorData {
    identifier: Ident,
    arguments: Vec<ArgumentData>,
    return_type: ReturnTypeData,
}

#[derive(Debug)]
struct ArgumentData {
    span: Span,
    dependency: Type,
}

#[derive(Debug)]
enum ReturnTypeData {
    Infallible,
    Result,
}

struct AttributeRemovalVisitor;

impl AttributeRemovalVisitor {
    fn is_custom_attribute(attr: &Attribute) -> bool {
        attr.path().is_ident("inject")
    }
}

impl VisitMut for AttributeRemovalVisitor {
    fn visit_attributes_mut(&mut self, attrs: &mut Vec<Attribute>) {
        attrs.retain(|attr| !Self::is_custom_attribute(attr));
        attrs
            .iter_mut()
            .for_each(|attr| visit_mut::visit_attribute_mut(self, attr));
    }
}

pub fn expand_implementation(
    impls: TokenStream,
    attr_data: AttributeData,
) -> SynResult<TokenStream2> {
    let mut impls = match syn::parse::<ItemImpl>(impls) {
        Ok(impls) => impls,
        Err(err) => {
            return Err(SynError::new(
                err.span(),
                "`#[component]` should be annotated on the `impl` block",
            ))
        }
    };

    if let Some((_, path, _)) = &impls.trait_ {
        return Err(SynError::new(
            path.span(),
            "`#[component]` should be annotated on an inherent `impl` block",
        ));
    }
    if !impls.generics.params.is_empty() {
        return Err(SynError::new(
            impls.generics.span(),
            "generic components are not supported",
        ));
    }

    let self_type = get_self_type(&impls)?;
    let ctor_data = get_constructor_signatures(&impls.items, impls.span())?
        .into_iter()
        .map(|signature| parse_constructor(&self_type, signature))
        .collect::<SynResult<Vec<_>>>()?;

    let expanded = expand_component_implementation(&self_type, ctor_data, attr_data);

    let mut visitor = AttributeRemovalVisitor;
    visitor.visit_item_impl_mut(&mut impls);

    Ok(quote! {
        #impls
        #expanded
    })
}

fn get_self_type(impls: &ItemImpl) -> SynResult<TypePath> {
    if let Type::Path(ty) = impls.self_ty.as_ref() {
        Ok(ty.clone())
    } else {
        Err(SynError::new(impls.self_ty.span(), "invalid self type"))
    }
}

fn get_constructor_signatures(items: &[ImplItem], impl_span: Span) -> SynResult<Vec<Signature>> {
    let ctors: Vec<_> = items
        .iter()
        .filter_map(filter_and_map_item_fn)
        .filter(is_annotated_with_inject)
        .collect();

    if ctors.is_empty() {
        return Err(SynError::new(
            impl_span,
            "no associated function is annotated with `#[inject]`",
        ));
    }

    ctors
        .into_iter()
        .map(|ctor| {
            if let Some(FnArg::Receiver(rec)) = ctor.sig.inputs.first() {
                Err(SynError::new(
                    rec.span(),
                    "method is not allowed to be annotated with `#[inject]`",
                ))
            } else {
                Ok(ctor.sig.clone())
            }
        })
        .collect()
}

fn filter_and_map_item_fn(item: &ImplItem) -> Option<&ImplItemFn> {
    if let ImplItem::Fn(impl_fn) = item {
        Some(impl_fn)
    } else {
        None
    }
}

fn is_annotated_with_inject(item_fn: &&ImplItemFn) -> bool {
    item_fn.attrs.iter().any(|attr| {
        let content = attr.meta.to_token_stream().to_string();
        &content == "inject"
    })
}

fn parse_constructor(self_type: &TypePath, signature: Signature) -> SynResult<ConstructorData> {
    if let Some(param) = signature.generics.params.first() {
        return Err(SynError::new(
            param.span(),
            "a constructor should not have generic parameters",
        ));
    }

    let identifier = signature.ident;
    let arguments = parse_constructor_arguments(signature.inputs)?;
    let return_type = parse_constructor_return_type(signature.output, self_type)?;

    Ok(ConstructorData {
        identifier,
        arguments,
        return_type,
    })
}

fn parse_constructor_arguments(inputs: Punctuated<FnArg, Comma>) -> SynResult<Vec<ArgumentData>> {
    inputs
        .into_iter()
        .map(|arg| {
            if let FnArg::Typed(arg) = arg {
                arg
            } else {
                unreachable!("a constructor should not have a receiver argument");
            }
        })
        .map(|arg| {
            let span = arg.span();
            parse_dependency_type(*arg.ty).map(|dependency| ArgumentData { span, dependency })
        })
        .collect()
}

fn parse_dependency_type(ty: Type) -> SynResult<Type> {
    let err = || {
        SynError::new(
            ty.span(),
            "a constructor's argument type should be `Arc<T>`, where `T` is the key to resolve",
        )
    };

    let Type::Path(TypePath { qself: None, path }) = &ty else {
        return Err(err());
    };
    let Some(last) = path.segments.last() else {
        return Err(err());
    };
    if last.ident != "Arc" {
        return Err(err());
    }
    let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) =
        &last.arguments
    else {
        return Err(err());
    };

    match (args.len(), args.first()) {
        (1, Some(GenericArgument::Type(dependency))) => Ok(dependency.clone()),
        _ => Err(err()),
    }
}

fn parse_constructor_return_type(
    output: ReturnType,
    self_type: &TypePath,
) -> Result<ReturnTypeData, SynError> {
    let span = output.span();
    let ReturnType::Type(_, return_type) = output else {
        return Err(SynError::new(
            span,
            "a constructor's return type should be `Self` or `Result<Self, E>`",
        ));
    };
    let Type::Path(return_type) = *return_type else {
        return Err(SynError::new(
            span,
            "a constructor's return type should be `Self` or `Result<Self, E>`",
        ));
    };

    let segments = &return_type.path.segments;

    let return_type = if &return_type == self_type {
        ReturnTypeData::Infallible
    } else if segments.len() == 1 && segments.first().unwrap().ident == "Self" {
        ReturnTypeData::Infallible
    } else if segments.len() == 1 && segments.first().unwrap().ident == "Result" {
        parse_result_return_type(&segments.first().unwrap().arguments, self_type)?
    } else if segments.len() == 3
        && segments.get(0).unwrap().ident == "std"
        && segments.get(1).unwrap().ident == "result"
        && segments.get(2).unwrap().ident == "Result"
    {
        parse_result_return_type(&segments.get(2).unwrap().arguments, self_type)?
    } else {
        return Err(SynError::new(
            return_type.span(),
            "a constructor's return type should be `Self` or `Result<Self, E>`",
        ));
    };
    Ok(return_type)
}

fn parse_result_return_type(
    type_args: &PathArguments,
    self_type: &TypePath,
) -> SynResult<ReturnTypeData> {
    let PathArguments::AngleBracketed(AngleBracketedGenericArguments {
        args: type_args, ..
    }) = type_args
    else {
        return Err(SynError::new(
            type_args.span(),
            "a constructor's return type should be `Self` or `Result<Self, E>`",
        ));
    };

    if type_args.len() != 2 {
        return Err(SynError::new(
            type_args.span(),
            "a constructor's return type should be `Self` or `Result<Self, E>`",
        ));
    }

    let GenericArgument::Type(Type::Path(first_type)) = type_args.get(0).unwrap() else {
        return Err(SynError::new(
            type_args.span(),
            "a constructor's return type should be `Self` or `Result<Self, E>`",
        ));
    };

    let segments = &first_type.path.segments;

    if first_type == self_type
        || (segments.len() == 1 && segments.first().is_some_and(|s| s.ident == "Self"))
    {
        Ok(ReturnTypeData::Result)
    } else {
        Err(SynError::new(
            type_args.span(),
            "a constructor's return type should be `Self` or `Result<Self, E>`",
        ))
    }
}

fn expand_constructor(ctor_data: &ConstructorData) -> TokenStream2 {
    let constructor = &ctor_data.identifier;

    let parameter_keys = ctor_data
        .arguments
        .iter()
        .map(|arg| {
            let dependency = &arg.dependency;
            quote! { tinyioc::key::TypeKey::of::<#dependency>(), }
        })
        .collect::<TokenStream2>();

    let get_dep_statements = ctor_data
        .arguments
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            let dep = Ident::new(&format!("dep{i}"), arg.span);
            let dependency = &arg.dependency;
            quote! { let #dep = arguments.next::<#dependency>()?; }
        })
        .collect::<TokenStream2>();

    let dep_args = ctor_data
        .arguments
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            let dep = Ident::new(&format!("dep{i}"), arg.span);
            quote! { #dep, }
        })
        .collect::<TokenStream2>();

    let wire_deps = if let ReturnTypeData::Infallible = &ctor_data.return_type {
        quote! { std::result::Result::Ok(Self::#constructor(#dep_args)) }
    } else {
        quote! { Self::#constructor(#dep_args).map_err(|err| arguments.fail(err)) }
    };

    let arguments = match (&ctor_data.return_type, ctor_data.arguments.is_empty()) {
        (ReturnTypeData::Infallible, true) => quote! { _arguments },
        _ => quote! { arguments },
    };

    quote! {
        .constructor(tinyioc::descriptor::Constructor::new(
            std::vec![#parameter_keys],
            |#arguments: &mut tinyioc::descriptor::Arguments| {
                #get_dep_statements
                #wire_deps
            },
        ))
    }
}

fn expand_component_implementation(
    self_type: &TypePath,
    ctor_data: Vec<ConstructorData>,
    attr_data: AttributeData,
) -> TokenStream2 {
    let constructors = ctor_data
        .iter()
        .map(expand_constructor)
        .collect::<TokenStream2>();

    let contracts = attr_data
        .contracts
        .iter()
        .map(|contract| {
            quote! {
                .implements::<#contract>(
                    |object: std::sync::Arc<Self>| -> std::sync::Arc<#contract> { object }
                )
            }
        })
        .collect::<TokenStream2>();

    quote! {
        impl tinyioc::descriptor::Component for #self_type {
            fn describe() -> tinyioc::descriptor::ComponentDescriptor<Self> {
                tinyioc::descriptor::ComponentDescriptor::new()
                    #constructors
                    #contracts
            }
        }
    }
}
