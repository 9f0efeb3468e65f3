use proc_macro_error::{abort, proc_macro_error};
use syn::{
    punctuated::Punctuated, spanned::Spanned, DeriveInput, Expr, ExprLit, Ident, Lit,
    MetaNameValue, Token,
};

/// Generates a `new(ctx)` constructor loading every `#[sound(...)]` field as a
/// `ggez::audio::Source`.
///
/// Supported keys: `path` (required, relative to the resource dir), `volume`
/// (float) and `repeat` (bool).
#[proc_macro_error]
#[proc_macro_derive(SoundBank, attributes(sound))]
pub fn sound_bank(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    struct SoundBankMeta<'a> {
        field_id: &'a Ident,
        path: String,
        volume: Option<f32>,
        repeat: bool,
    }

    let input: DeriveInput = match syn::parse(input) {
        Ok(input) => input,
        Err(e) => return e.to_compile_error().into(),
    };
    let id = &input.ident;
    let syn::Data::Struct(ref data) = input.data else {
        abort!(input.span(), "sound bank works only on structs")
    };

    let mut meta = vec![];

    for field in data.fields.iter() {
        let Some(name) = field.ident.as_ref() else {
            abort!(field.span(), "sound bank fields must be named")
        };

        let Some(attr) = field
            .attrs
            .iter()
            .find(|attr| attr.meta.path().is_ident("sound"))
        else {
            abort!(field.span(), "every sound bank field needs a #[sound(path = ..)]")
        };

        let mut bank = SoundBankMeta {
            field_id: name,
            path: String::new(),
            volume: None,
            repeat: false,
        };

        let Ok(list) = attr.meta.require_list() else {
            abort!(attr.span(), "must be list")
        };
        let Ok(pairs) =
            list.parse_args_with(Punctuated::<MetaNameValue, Token![,]>::parse_terminated)
        else {
            abort!(list.span(), "must be name value pairs")
        };

        for item in pairs {
            let Expr::Lit(ExprLit { ref lit, .. }) = item.value else {
                abort!(item.span(), "sound attribute values must be literals")
            };

            if item.path.is_ident("path") {
                let Lit::Str(str) = lit else {
                    abort!(lit.span(), "path must be str lit")
                };
                bank.path = format!("/{}", str.value().trim_start_matches('/'));
            } else if item.path.is_ident("volume") {
                let Lit::Float(float) = lit else {
                    abort!(lit.span(), "volume must be a float lit")
                };
                let Ok(volume) = float.base10_parse::<f32>() else {
                    abort!(lit.span(), "volume must fit in f32")
                };
                bank.volume = Some(volume);
            } else if item.path.is_ident("repeat") {
                let Lit::Bool(flag) = lit else {
                    abort!(lit.span(), "repeat must be a bool lit")
                };
                bank.repeat = flag.value;
            } else {
                abort!(item.path.span(), "unknown sound attribute")
            }
        }

        if bank.path.is_empty() {
            abort!(attr.span(), "sound needs a path")
        }

        meta.push(bank);
    }

    let tokens = meta.iter().map(|bank| {
        let field = &bank.field_id;
        let sound_path = &bank.path;
        let volume = bank.volume.map(|volume| {
            quote::quote!(ggez::audio::SoundSource::set_volume(&mut source, #volume);)
        });
        let repeat = bank.repeat.then(|| {
            quote::quote!(ggez::audio::SoundSource::set_repeat(&mut source, true);)
        });
        quote::quote!(#field: {
            #[allow(unused_mut)]
            let mut source = ggez::audio::Source::new(ctx, #sound_path)?;
            #volume
            #repeat
            source
        },)
    });

    quote::quote!(
        impl #id {
            pub fn new(ctx: &mut ggez::Context) -> Result<Self, ggez::GameError> {
                Ok(Self {
                    #(#tokens)*
                })
            }
        }
    )
    .into()
}
