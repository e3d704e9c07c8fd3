use darling::{ast, util::Flag, FromDeriveInput, FromField};
use quote::{format_ident, quote};

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct PartialInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), PartialFieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(attributes(partial), forward_attrs)]
struct PartialFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,

	skip: Flag,
}

fn is_partial(attr: &syn::Attribute) -> bool {
	attr.path().is_ident("partial")
}

/// `CreateUserInput` becomes `UpdateUserInput`, anything else is prefixed with `Update`.
fn update_ident(ident: &syn::Ident) -> syn::Ident {
	let name = ident.to_string();

	match name.strip_prefix("Create") {
		Some(rest) if !rest.is_empty() => format_ident!("Update{}", rest),
		_ => format_ident!("Update{}", name),
	}
}

pub fn from_input(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let mut input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match PartialInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	// The `partial` helper attribute is only meaningful to this macro
	if let syn::Data::Struct(ref mut data) = input.data {
		for field in data.fields.iter_mut() {
			field.attrs.retain(|attr| !is_partial(attr));
		}
	}

	let vis = &input.vis;
	let generics = &receiver.generics;
	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
	let ident = update_ident(&receiver.ident);
	let attrs = &receiver.attrs;

	let Some(fields) = receiver.data.take_struct() else {
		return syn::Error::new_spanned(&input.ident, "expected a struct with named fields")
			.into_compile_error()
			.into();
	};

	let fields = fields
		.iter()
		.filter(|field| !field.skip.is_present())
		.filter_map(|field| {
			let ident = field.ident.as_ref()?;
			let attrs = field
				.attrs
				.iter()
				.filter(|attr| !is_partial(attr))
				.collect::<Vec<_>>();

			Some((attrs, ident, &field.ty, &field.vis))
		})
		.collect::<Vec<_>>();

	let update_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		quote! {
			#(#attrs)*
			#vis #ident: Option<#ty>,
		}
	});

	let idents = fields.iter().map(|(_, ident, ..)| ident).collect::<Vec<_>>();

	quote! {
		#input

		#(#attrs)*
		#vis struct #ident #generics {
			#(
				#update_fields
			)*
		}

		impl #impl_generics #ident #ty_generics #where_clause {
			/// Returns `true` if no field is present, making the update a no-op.
			#[allow(dead_code)]
			pub fn is_empty(&self) -> bool {
				true #(&& self.#idents.is_none())*
			}
		}

		impl #impl_generics Default for #ident #ty_generics #where_clause {
			fn default() -> Self {
				Self {
					#(
						#idents: None,
					)*
				}
			}
		}
	}
	.into()
}
