use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};

/// This macro is added before a method of `BlackjackEnv` in the impl block.
/// Use this macro to first check if the current phase is exactly the phase in
/// the attribute.
///
/// For example, `#[allowed_phase(InPlay)]` will make a method first check
/// if `self.phase` is `Phase::InPlay`. If not, the method returns
/// `Err(EnvError::WrongPhase { .. })` naming the method, the expected phase
/// and the actual one. `Phase` and `EnvError` must be in scope where the
/// macro is used.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let mut ast: syn::ImplItemFn = match syn::parse(item) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };
    let phase: syn::Ident = match syn::parse(attr) {
        Ok(phase) => phase,
        Err(err) => return err.to_compile_error().into(),
    };
    let operation = ast.sig.ident.to_string();

    let early_return: syn::Stmt = match syn::parse2(phase_check(&phase, &operation)) {
        Ok(stmt) => stmt,
        Err(err) => return err.to_compile_error().into(),
    };
    ast.block.stmts.insert(0, early_return);
    ast.into_token_stream().into()
}

fn phase_check(phase: &syn::Ident, operation: &str) -> TokenStream2 {
    quote! {
        if self.phase != Phase::#phase {
            return Err(EnvError::WrongPhase {
                operation: #operation,
                expected: Phase::#phase,
                actual: self.phase,
            });
        }
    }
}
