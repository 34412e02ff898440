use std::collections::HashMap;

/// Answer for anything that is not in the book.
pub const NO_COMPRENDO: &str = "No comprendo";

/// The quotations the board sends and the line that completes each one.
pub struct QuoteBook {
    replies: HashMap<&'static str, &'static str>,
}

impl QuoteBook {
    pub fn new() -> Self {
        QuoteBook {
            replies: maplit::hashmap! {
                "No todo lo que es oro reluce..." => "...Ni todos los que vagan están perdidos.",
                "Aún en la oscuridad..." => "...brilla una luz.",
                "¿Qué es la vida?" => "Nada más que un breve caminar a la luz del sol.",
                "No temas a la oscuridad..." => "...pues en ella se esconden las estrellas.",
                "Hasta los más pequeños..." => "...pueden cambiar el curso del futuro.",
                "No digas que el sol se ha puesto..." => "...si aún te queda la luna.",
                "El coraje se encuentra..." => "...en los lugares más inesperados.",
                "No todos los tesoros..." => "...son oro y plata.",
                "Es peligroso..." => "...cruzar tu puerta.",
                "Un mago nunca llega tarde..." =>
                    "...ni pronto, Frodo Bolsón. Llega precisamente cuando se lo propone.",
                "Aún hay esperanza..." => "...mientras la Compañía permanezca fiel.",
                "El mundo está cambiando..." => "...Siento que algo se avecina.",
                "Las raíces profundas..." => "...no alcanzan las heladas.",
                "No se puede..." => "...pasar.",
                "Y sobre todo..." => "...cuidado con el Anillo.",
                "De las cenizas, un fuego..." => "...se despertará.",
            },
        }
    }

    /// Exact match only; anything else gets [`NO_COMPRENDO`].
    pub fn reply_to(&self, prompt: &str) -> &'static str {
        self.replies.get(prompt).copied().unwrap_or(NO_COMPRENDO)
    }
}

impl Default for QuoteBook {
    fn default() -> Self {
        QuoteBook::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_all_sixteen() {
        assert_eq!(QuoteBook::new().replies.len(), 16);
    }

    #[test]
    fn completes_known_prompt() {
        let book = QuoteBook::new();
        assert_eq!(book.reply_to("No se puede..."), "...pasar.");
        assert_eq!(
            book.reply_to("¿Qué es la vida?"),
            "Nada más que un breve caminar a la luz del sol."
        );
    }

    #[test]
    fn lookup_is_exact() {
        let book = QuoteBook::new();
        assert_eq!(book.reply_to("No se puede"), NO_COMPRENDO);
        assert_eq!(book.reply_to("no se puede..."), NO_COMPRENDO);
        assert_eq!(book.reply_to("No se puede... "), NO_COMPRENDO);
        assert_eq!(book.reply_to(""), NO_COMPRENDO);
    }
}
