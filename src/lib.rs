pub mod configuration;

pub mod math {
    pub mod curve {
        pub mod curve;
        pub mod nonparametriccurve {
            pub mod nonparametriccurve;
            pub mod tabulatedfunctionerror;
            pub mod tabulatedfunction;
            pub mod accesscache;
            pub mod arraytabulatedfunction;
            pub mod linkedlisttabulatedfunction;
        }
    }
}
