use crate::interner::{self, SymId};

/// The fixed identifiers whose operands are passed unevaluated. Dispatch is
/// by interned name; the forms are not redefinable as data.
#[derive(Debug, Clone)]
pub struct SpecialFormRegistry {
    pub s_if: SymId,
    pub s_quote: SymId,
    pub s_lambda: SymId,
    pub s_and: SymId,
    pub s_or: SymId,
    pub s_define: SymId,
    pub s_set: SymId,
    pub s_eval: SymId,
}

impl SpecialFormRegistry {
    pub fn new() -> Self {
        Self {
            s_if: interner::intern_sym("if"),
            s_quote: interner::intern_sym("quote"),
            s_lambda: interner::intern_sym("lambda"),
            s_and: interner::intern_sym("and"),
            s_or: interner::intern_sym("or"),
            s_define: interner::intern_sym("define"),
            s_set: interner::intern_sym("set!"),
            s_eval: interner::intern_sym("eval"),
        }
    }

    pub fn all(&self) -> [SymId; 8] {
        [
            self.s_if,
            self.s_quote,
            self.s_lambda,
            self.s_and,
            self.s_or,
            self.s_define,
            self.s_set,
            self.s_eval,
        ]
    }
}

impl Default for SpecialFormRegistry {
    fn default() -> Self {
        Self::new()
    }
}
