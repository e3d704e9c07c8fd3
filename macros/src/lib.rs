mod partial;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the original function with the suffix `_docs`.
///
/// The first line of the doc comment becomes the operation summary, and the remaining
/// lines become the description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates an `UpdateXInput` struct from a `CreateXInput` struct, wrapping every field in an [`Option`].
///
/// Struct attributes and field attributes (including `#[validate(..)]`) are copied verbatim, so a
/// present value is validated exactly like it would be on creation. Fields marked with
/// `#[partial(skip)]` are left out of the update struct.
#[proc_macro_attribute]
pub fn partial(_args: TokenStream, input: TokenStream) -> TokenStream {
	partial::from_input(input)
}
